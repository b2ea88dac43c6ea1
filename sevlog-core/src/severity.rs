use std::{fmt, str::FromStr};

use log::Level;

use crate::{
    error::SevlogError,
    writer::Stream,
};

/// Canonical severity names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityName {
    Debug,
    Info,
    Warning,
    Error,
}

impl SeverityName {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityName::Debug => "debug",
            SeverityName::Info => "info",
            SeverityName::Warning => "warning",
            SeverityName::Error => "error",
        }
    }
}

impl fmt::Display for SeverityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, ranked log level bound to a fixed output stream.
///
/// A higher priority is more verbose. The numbers follow syslog, so warning
/// (4) and info (6) are not adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Severity {
    pub priority: u8,
    pub display_label: &'static str,
    pub name: SeverityName,
    pub stream: Stream,
}

pub const DEBUG: Severity = Severity {
    priority: 7,
    display_label: "DEBUG",
    name: SeverityName::Debug,
    stream: Stream::Stdout,
};

pub const INFO: Severity = Severity {
    priority: 6,
    display_label: "INFO",
    name: SeverityName::Info,
    stream: Stream::Stdout,
};

pub const WARNING: Severity = Severity {
    priority: 4,
    display_label: "WARNING",
    name: SeverityName::Warning,
    stream: Stream::Stderr,
};

pub const ERROR: Severity = Severity {
    priority: 3,
    display_label: "ERROR",
    name: SeverityName::Error,
    stream: Stream::Stderr,
};

/// Every severity, most verbose first.
pub const SEVERITIES: [Severity; 4] = [DEBUG, INFO, WARNING, ERROR];

impl Severity {
    /// Case-insensitive lookup by name.
    pub fn lookup(name: &str) -> Option<Severity> {
        SEVERITIES
            .into_iter()
            .find(|severity| severity.name.as_str().eq_ignore_ascii_case(name))
    }

    pub fn from_priority(priority: u8) -> Option<Severity> {
        match priority {
            7 => Some(DEBUG),
            6 => Some(INFO),
            4 => Some(WARNING),
            3 => Some(ERROR),
            _ => None,
        }
    }

    /// Whether a logger configured at `self` emits a message of severity `message`.
    pub fn permits(self, message: Severity) -> bool {
        self.priority >= message.priority
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label)
    }
}

impl FromStr for Severity {
    type Err = SevlogError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Severity::lookup(name).ok_or_else(|| SevlogError::UnknownSeverity(name.into()))
    }
}

impl From<SeverityName> for Severity {
    fn from(name: SeverityName) -> Self {
        match name {
            SeverityName::Debug => DEBUG,
            SeverityName::Info => INFO,
            SeverityName::Warning => WARNING,
            SeverityName::Error => ERROR,
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => ERROR,
            Level::Warn => WARNING,
            Level::Info => INFO,
            Level::Debug | Level::Trace => DEBUG,
        }
    }
}
