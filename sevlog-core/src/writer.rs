use std::{
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

/// Process output stream a line is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

pub trait LogWriter {
    /// Appends one already terminated line to `stream`.
    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Writes to the process standard output and standard error.
#[derive(Default, Debug)]
pub struct LogStd;

impl LogWriter for LogStd {
    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()> {
        match stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.flush()
            }
            Stream::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(line.as_bytes())?;
                err.flush()
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        io::stderr().flush()
    }
}

/// In-memory writer. Clones share the same buffer.
#[derive(Default, Debug, Clone)]
pub struct LogMemory {
    lines: Arc<Mutex<Vec<(Stream, String)>>>,
}

impl LogMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every captured line in write order, with the stream it targeted.
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn stdout(&self) -> Vec<String> {
        self.on(Stream::Stdout)
    }

    pub fn stderr(&self) -> Vec<String> {
        self.on(Stream::Stderr)
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn on(&self, stream: Stream) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|(s, line)| (s == stream).then_some(line))
            .collect()
    }
}

impl LogWriter for LogMemory {
    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stream, line.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_log_memory() {
    let memory = LogMemory::new();
    let mut writer = memory.clone();
    writer.write_line(Stream::Stdout, "Hello, world!\n").unwrap();
    writer.write_line(Stream::Stderr, "rust is awesome !\n").unwrap();
    writer.write_line(Stream::Stdout, "test\n").unwrap();
    assert_eq!(memory.stdout(), vec!["Hello, world!\n", "test\n"]);
    assert_eq!(memory.stderr(), vec!["rust is awesome !\n"]);
    assert_eq!(memory.lines().len(), 3);
    memory.clear();
    assert!(memory.lines().is_empty());
}

#[test]
fn test_log_std() {
    let mut writer = LogStd;
    writer.write_line(Stream::Stdout, "to stdout\n").unwrap();
    writer.write_line(Stream::Stderr, "to stderr\n").unwrap();
    writer.flush().unwrap();
}
