use std::sync::LazyLock;

use derive_from_env::FromEnv;

use crate::severity::{DEBUG, Severity};

/// Process configuration read from `SEVLOG_*` environment variables.
///
/// Fields are kept as raw strings so one malformed variable never discards
/// the others; each is interpreted on its own.
#[derive(FromEnv, Debug, Clone)]
#[from_env(prefix = "SEVLOG")]
#[allow(non_snake_case)]
pub struct SevlogConfig {
    /// Default severity name, case-insensitive.
    #[from_env(default = "debug")]
    pub LEVEL: String,
    /// Tint display labels with ANSI colors: `1`, `true`, `yes` or `on`.
    #[from_env(default = "false")]
    pub COLOR: String,
}

impl Default for SevlogConfig {
    fn default() -> Self {
        Self {
            LEVEL: "debug".into(),
            COLOR: "false".into(),
        }
    }
}

impl SevlogConfig {
    /// Severity named by `LEVEL`, or debug when the name is not recognized.
    pub fn default_severity(&self) -> Severity {
        Severity::lookup(self.LEVEL.trim()).unwrap_or(DEBUG)
    }

    /// Whether `COLOR` asks for colors. Anything unrecognized means no.
    pub fn colored(&self) -> bool {
        ["1", "true", "yes", "on"]
            .iter()
            .any(|yes| self.COLOR.trim().eq_ignore_ascii_case(yes))
    }
}

pub static SEVLOG_CONFIG: LazyLock<SevlogConfig> =
    LazyLock::new(|| SevlogConfig::from_env().unwrap_or_default());
