//! # sevlog-core
//! Core utilities for sevlog: severity registry, message formatting, line
//! rendering, output writers and the context interface.

mod config;
mod context;
mod error;
mod line;
mod message;
mod severity;
mod writer;

pub use config::{SEVLOG_CONFIG, SevlogConfig};
pub use context::{ContextAccessor, NoContext, TRANSACTION_ID_KEY, transaction_id};
pub use error::{Result, SevlogError};
pub use line::{format_line, timestamp};
pub use message::{Loggable, UNSERIALIZABLE, format_messages};
pub use severity::{DEBUG, ERROR, INFO, SEVERITIES, Severity, SeverityName, WARNING};
pub use writer::{LogMemory, LogStd, LogWriter, Stream};
