use thiserror::Error;

/// Errors surfaced by sevlog to the call site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SevlogError {
    /// A level name outside debug, info, warning and error.
    #[error("unrecognized severity `{0}`, expected one of debug, info, warning, error")]
    UnknownSeverity(String),

    /// A `log` facade logger was already installed for this process.
    #[error("a logger is already installed for the `log` facade")]
    BridgeInstalled,
}

pub type Result<T> = std::result::Result<T, SevlogError>;
