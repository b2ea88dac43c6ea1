use std::{
    io,
    ops::Deref,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU8, Ordering},
    },
};

use sevlog_core::{
    ContextAccessor, DEBUG, ERROR, INFO, LogWriter, Loggable, Result, Severity, SeverityName,
    WARNING, format_line, format_messages, timestamp, transaction_id,
};

/// Priority value standing for "no override".
const UNSET: u8 = 0;

/// Default severity cell, shared by a main logger and every logger it created.
///
/// Main loggers built on the same cell (see [`crate::process_severity`] and
/// [`crate::ConfigBuilder::with_global`]) observe each other's level changes.
#[derive(Debug)]
pub struct GlobalSeverity(AtomicU8);

impl GlobalSeverity {
    pub fn new(severity: Severity) -> Self {
        Self(AtomicU8::new(severity.priority))
    }

    pub fn get(&self) -> Severity {
        Severity::from_priority(self.0.load(Ordering::Acquire)).unwrap_or(DEBUG)
    }

    pub fn set(&self, severity: Severity) {
        self.0.store(severity.priority, Ordering::Release);
    }
}

/// State shared between a main logger and its children.
pub(crate) struct Shared {
    pub(crate) default: Arc<GlobalSeverity>,
    pub(crate) writer: Mutex<Box<dyn LogWriter + Send>>,
    pub(crate) context: Arc<dyn ContextAccessor>,
    pub(crate) colored: bool,
}

/// Where a logger's level lives.
enum LevelSlot {
    /// Own override, [`UNSET`] while the logger follows the global default.
    Own(AtomicU8),
    /// The logger's level is the global default itself.
    Global,
}

/// A labelled logger.
///
/// Its effective severity is its own override when one was set, the global
/// default otherwise. Every call method returns the logger for chaining.
pub struct Logger {
    label: String,
    slot: LevelSlot,
    shared: Arc<Shared>,
}

impl Logger {
    fn child(label: &str, shared: Arc<Shared>) -> Self {
        Self {
            label: label.into(),
            slot: LevelSlot::Own(AtomicU8::new(UNSET)),
            shared,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Effective severity at call time.
    pub fn severity(&self) -> Severity {
        match &self.slot {
            LevelSlot::Own(cell) => Severity::from_priority(cell.load(Ordering::Acquire))
                .unwrap_or_else(|| self.shared.default.get()),
            LevelSlot::Global => self.shared.default.get(),
        }
    }

    /// Canonical name of the effective severity.
    pub fn level(&self) -> SeverityName {
        self.severity().name
    }

    /// Sets the level by name; on the main logger this moves the global default.
    ///
    /// Unrecognized names are rejected and the previous level is kept.
    pub fn set_level(&self, name: &str) -> Result<&Self> {
        let severity = name.parse::<Severity>()?;
        self.set_severity(severity);
        Ok(self)
    }

    pub fn set_severity(&self, severity: Severity) -> &Self {
        match &self.slot {
            LevelSlot::Own(cell) => cell.store(severity.priority, Ordering::Release),
            LevelSlot::Global => self.shared.default.set(severity),
        }
        self
    }

    /// Whether a message of `severity` passes this logger's effective severity.
    pub fn should_emit(&self, severity: Severity) -> bool {
        self.severity().permits(severity)
    }

    pub fn debug<I>(&self, messages: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Loggable>,
    {
        self.log(DEBUG, messages)
    }

    pub fn info<I>(&self, messages: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Loggable>,
    {
        self.log(INFO, messages)
    }

    pub fn warning<I>(&self, messages: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Loggable>,
    {
        self.log(WARNING, messages)
    }

    pub fn error<I>(&self, messages: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Loggable>,
    {
        self.log(ERROR, messages)
    }

    /// Logs at `severity`. Write failures are dropped.
    pub fn log<I>(&self, severity: Severity, messages: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<Loggable>,
    {
        self.try_log(severity, messages).ok();
        self
    }

    /// Like [`Logger::log`] but reports write failures.
    /// Returns whether a line was written.
    pub fn try_log<I>(&self, severity: Severity, messages: I) -> io::Result<bool>
    where
        I: IntoIterator,
        I::Item: Into<Loggable>,
    {
        if !self.should_emit(severity) {
            return Ok(false);
        }
        let messages: Vec<Loggable> = messages.into_iter().map(Into::into).collect();
        self.emit(&self.label, severity, &format_messages(&messages))?;
        Ok(true)
    }

    pub(crate) fn emit(&self, label: &str, severity: Severity, message: &str) -> io::Result<()> {
        let txid = transaction_id(self.shared.context.as_ref());
        let line = format_line(
            &timestamp(),
            label,
            &txid,
            severity,
            message,
            self.shared.colored,
        );
        self.shared
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_line(severity.stream, &line)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.shared
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

/// The root logger: empty label, its level is the global default, and it
/// creates the other loggers.
pub struct MainLogger(Logger);

impl MainLogger {
    pub(crate) fn new(shared: Shared) -> Self {
        Self(Logger {
            label: String::new(),
            slot: LevelSlot::Global,
            shared: Arc::new(shared),
        })
    }

    /// New logger following the global default.
    pub fn create(&self, label: &str) -> Logger {
        Logger::child(label, Arc::clone(&self.0.shared))
    }

    /// New logger with its own level.
    pub fn create_with_level(&self, label: &str, level: &str) -> Result<Logger> {
        let severity = level.parse::<Severity>()?;
        let logger = self.create(label);
        logger.set_severity(severity);
        Ok(logger)
    }
}

impl Deref for MainLogger {
    type Target = Logger;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::{error::Error, fmt, thread};

    use sevlog_core::{LogMemory, NoContext, SEVERITIES, SevlogError, Stream, TRANSACTION_ID_KEY};

    use super::*;
    use crate::logger_config;

    fn main_at(level: &str) -> (MainLogger, LogMemory) {
        let memory = LogMemory::new();
        let main = logger_config()
            .with_level(level)
            .with_writer(memory.clone())
            .with_context(NoContext)
            .build();
        (main, memory)
    }

    #[derive(Debug)]
    struct Boom;
    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }
    impl Error for Boom {}

    #[test]
    fn test_should_emit_matches_priorities() {
        let (main, _) = main_at("debug");
        let logger = main.create("svc");
        for configured in SEVERITIES {
            logger.set_severity(configured);
            for message in SEVERITIES {
                assert_eq!(
                    logger.should_emit(message),
                    logger.severity().priority >= message.priority
                );
            }
        }
    }

    #[test]
    fn test_warning_default_scenario() {
        let (main, memory) = main_at("warning");
        let logger = main.create("cache");
        logger.error(["db down"]);
        logger.info(["cache hit"]);
        assert_eq!(memory.stderr().len(), 1);
        assert!(memory.stderr()[0].ends_with(" [cache][] ERROR: db down\n"));
        assert!(memory.stdout().is_empty());

        logger.set_level("debug").unwrap();
        logger.info(["cache hit"]);
        assert_eq!(memory.stdout().len(), 1);
        assert!(memory.stdout()[0].ends_with(" [cache][] INFO: cache hit\n"));
    }

    #[test]
    fn test_suppressed_calls_write_nothing() {
        let (main, memory) = main_at("error");
        let logger = main.create("quiet");
        logger.debug(["a"]).info(["b"]).warning(["c"]);
        main.debug(["d"]);
        assert!(memory.lines().is_empty());
        assert_eq!(logger.try_log(INFO, ["e"]).unwrap(), false);
        assert!(memory.lines().is_empty());
    }

    #[test]
    fn test_own_level_does_not_leak() {
        let (main, _) = main_at("info");
        let a = main.create("a");
        let b = main.create("b");
        a.set_level("error").unwrap();
        assert_eq!(a.level(), SeverityName::Error);
        assert_eq!(b.level(), SeverityName::Info);
        assert_eq!(main.level(), SeverityName::Info);
    }

    #[test]
    fn test_main_level_is_global_default() {
        let (main, _) = main_at("debug");
        let before = main.create("before");
        let pinned = main.create_with_level("pinned", "info").unwrap();
        main.set_level("WARNING").unwrap();
        let after = main.create("after");
        assert_eq!(before.level(), SeverityName::Warning);
        assert_eq!(after.level(), SeverityName::Warning);
        assert_eq!(pinned.level(), SeverityName::Info);
        main.set_level("error").unwrap();
        assert_eq!(before.level(), SeverityName::Error);
        assert_eq!(after.level(), SeverityName::Error);
        assert_eq!(pinned.level(), SeverityName::Info);
    }

    #[test]
    fn test_create_with_level_ignores_default() {
        let (main, _) = main_at("error");
        let logger = main.create_with_level("verbose", "debug").unwrap();
        assert_eq!(logger.severity(), DEBUG);
        assert_eq!(logger.label(), "verbose");
        assert!(matches!(
            main.create_with_level("broken", "loud"),
            Err(SevlogError::UnknownSeverity(name)) if name == "loud"
        ));
    }

    #[test]
    fn test_unknown_level_fails_fast() {
        let (main, _) = main_at("info");
        let logger = main.create("svc");
        logger.set_level("warning").unwrap();
        assert!(logger.set_level("verbose").is_err());
        assert_eq!(logger.level(), SeverityName::Warning);
        assert!(main.set_level("").is_err());
        assert_eq!(main.level(), SeverityName::Info);
    }

    #[test]
    fn test_unknown_configured_level_defaults_to_debug() {
        let (main, _) = main_at("chatty");
        assert_eq!(main.level(), SeverityName::Debug);
        assert_eq!(main.label(), "");
    }

    #[test]
    fn test_error_value_lands_on_stderr() {
        let (main, memory) = main_at("debug");
        main.create("jobs").error([Loggable::error(&Boom)]);
        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        let (stream, line) = &lines[0];
        assert_eq!(*stream, Stream::Stderr);
        assert!(line.contains("[jobs]"));
        assert!(line.contains(" ERROR: boom"));
    }

    #[test]
    fn test_stream_follows_message_severity() {
        let (main, memory) = main_at("debug");
        let logger = main.create_with_level("svc", "error").unwrap();
        logger.error(["e"]);
        main.debug(["d"]).info(["i"]).warning(["w"]);
        assert_eq!(memory.stdout().len(), 2);
        assert_eq!(memory.stderr().len(), 2);
    }

    #[test]
    fn test_transaction_id_from_context() {
        struct Fixed;
        impl ContextAccessor for Fixed {
            fn get(&self, key: &str) -> Option<String> {
                (key == TRANSACTION_ID_KEY).then(|| "tx-42".to_string())
            }
        }
        let memory = LogMemory::new();
        let main = logger_config()
            .with_writer(memory.clone())
            .with_context(Fixed)
            .build();
        main.create("payments").error(["insufficient", "funds"]);
        assert!(memory.stderr()[0].ends_with(" [payments][tx-42] ERROR: insufficient funds\n"));
    }

    #[test]
    fn test_missing_context_never_prints_placeholders() {
        let (main, memory) = main_at("debug");
        main.info(["ready"]);
        let line = &memory.stdout()[0];
        assert!(line.contains(" [][] INFO: ready"));
        assert!(!line.contains("undefined"));
        assert!(!line.contains("null"));
    }

    #[test]
    fn test_write_failures_do_not_escape_log() {
        struct Closed;
        impl LogWriter for Closed {
            fn write_line(&mut self, _: Stream, _: &str) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let main = logger_config()
            .with_writer(Closed)
            .with_context(NoContext)
            .build();
        main.error(["lost"]).info(["lost too"]);
        let err = main.try_log(ERROR, ["lost"]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_concurrent_level_updates() {
        let (main, memory) = main_at("debug");
        let child = main.create("worker");
        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..1000 {
                    let severity = SEVERITIES[i % SEVERITIES.len()];
                    main.set_severity(severity);
                }
            });
            s.spawn(|| {
                for _ in 0..1000 {
                    assert!(SEVERITIES.contains(&child.severity()));
                    child.error(["tick"]);
                }
            });
        });
        assert_eq!(memory.stderr().len(), 1000);
    }
}
