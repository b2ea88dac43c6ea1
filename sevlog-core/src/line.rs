use chrono::{Local, SecondsFormat};
use colored::Colorize;

use crate::severity::{Severity, SeverityName};

/// Local wall-clock time, RFC 3339 with milliseconds and a numeric offset.
pub fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Renders `"<timestamp> [<label>][<txid>] <LABEL>: <message>\n"`.
pub fn format_line(
    timestamp: &str,
    label: &str,
    txid: &str,
    severity: Severity,
    message: &str,
    colored: bool,
) -> String {
    let display = severity.display_label;
    if colored {
        let display = match severity.name {
            SeverityName::Error => display.red(),
            SeverityName::Warning => display.yellow(),
            SeverityName::Info => display.green(),
            SeverityName::Debug => display.blue(),
        };
        format!("{timestamp} [{label}][{txid}] {display}: {message}\n")
    } else {
        format!("{timestamp} [{label}][{txid}] {display}: {message}\n")
    }
}
