//! # sevlog
//! Labelled loggers sharing one process-wide default level, writing
//! timestamped lines to stdout (debug, info) or stderr (warning, error).
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! sevlog = "0.1.0"
//! ```
//!
//! ```rust
//! use sevlog::main_logger;
//!
//! let main = main_logger();
//! let payments = main.create("payments");
//! payments.info(["charged", "order-17"]);
//! sevlog::error!(payments, "insufficient funds", 42);
//! ```
//!
//! ## Levels
//! The main logger's level is the default of every logger that has no level of
//! its own. A logger created with a level keeps it whatever the default does.
//!
//! ```rust
//! use sevlog::{LogMemory, SeverityName, logger_config};
//!
//! let memory = LogMemory::new();
//! let main = logger_config()
//!     .with_level("warning")
//!     .with_writer(memory.clone())
//!     .build();
//! let jobs = main.create("jobs");
//! let audit = main.create_with_level("audit", "debug").unwrap();
//! jobs.info(["dropped"]);
//! audit.info(["kept"]);
//! main.set_level("debug").unwrap();
//! assert_eq!(jobs.level(), SeverityName::Debug);
//! assert_eq!(memory.stdout().len(), 1);
//! assert!(main.set_level("verbose").is_err());
//! ```
//!
//! ## Transaction ids
//! Lines carry the transaction id bound to the calling thread, if any.
//!
//! ```rust
//! use sevlog::{LogMemory, ThreadContext, logger_config, new_transaction_id};
//!
//! let memory = LogMemory::new();
//! let main = logger_config().with_writer(memory.clone()).build();
//! ThreadContext::scope_transaction("tx-42", || {
//!     main.create("payments").error(["insufficient funds"]);
//! });
//! ThreadContext::scope_transaction(new_transaction_id(), || main.info(["next request"]));
//! assert!(memory.stderr()[0].ends_with("[payments][tx-42] ERROR: insufficient funds\n"));
//! ```

mod context;
mod logger;
mod macros;

use std::sync::{Arc, LazyLock, Mutex};

use log::{LevelFilter, Log};

pub use context::{ThreadContext, new_transaction_id};
pub use logger::{GlobalSeverity, Logger, MainLogger};
use logger::Shared;
pub use sevlog_core::{
    ContextAccessor, DEBUG, ERROR, INFO, LogMemory, LogStd, LogWriter, Loggable, NoContext,
    Result, SEVERITIES, SEVLOG_CONFIG, Severity, SeverityName, SevlogConfig, SevlogError, Stream,
    TRANSACTION_ID_KEY, WARNING, format_messages,
};

/// The one default severity of the process, seeded from `SEVLOG_LEVEL`.
static PROCESS_SEVERITY: LazyLock<Arc<GlobalSeverity>> =
    LazyLock::new(|| Arc::new(GlobalSeverity::new(SEVLOG_CONFIG.default_severity())));

/// Process-wide main logger, configured from `SEVLOG_*` variables.
static MAIN_LOGGER: LazyLock<MainLogger> = LazyLock::new(|| {
    logger_config()
        .from_env()
        .with_global(process_severity())
        .build()
});

/// The process default severity cell. Every process-wide main logger, whatever
/// its context, is built on it.
pub fn process_severity() -> Arc<GlobalSeverity> {
    Arc::clone(&PROCESS_SEVERITY)
}

/// The process-wide main logger, writing to the real output streams and reading
/// transaction ids from [`ThreadContext`].
pub fn main_logger() -> &'static MainLogger {
    &MAIN_LOGGER
}

/// Routes `log` facade records through a main logger.
struct SevLogger(&'static MainLogger);

impl Log for SevLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.0.should_emit(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let severity = Severity::from(record.level());
        if !self.0.should_emit(severity) {
            return;
        }
        self.0
            .emit(record.target(), severity, &record.args().to_string())
            .ok();
    }

    fn flush(&self) {
        self.0.flush().ok();
    }
}

/// Installs `main` behind the `log` macros. Records are labelled with their target.
pub fn init_log_bridge(main: &'static MainLogger) -> Result<()> {
    log::set_boxed_logger(Box::new(SevLogger(main))).map_err(|_| SevlogError::BridgeInstalled)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

/// Builder for configuring and creating a main logger.
pub struct ConfigBuilder {
    level: Severity,
    global: Option<Arc<GlobalSeverity>>,
    colored: bool,
    writer: Box<dyn LogWriter + Send>,
    context: Arc<dyn ContextAccessor>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            level: DEBUG,
            global: None,
            colored: false,
            writer: Box::new(LogStd),
            context: Arc::new(ThreadContext),
        }
    }
}

impl ConfigBuilder {
    /// Sets the default level. Unrecognized names fall back to debug.
    pub fn with_level(self, name: &str) -> Self {
        Self {
            level: Severity::lookup(name).unwrap_or(DEBUG),
            ..self
        }
    }
    /// Sets the default level from an already resolved severity.
    pub fn with_severity(self, level: Severity) -> Self {
        Self { level, ..self }
    }
    /// Shares an existing default severity cell instead of creating one.
    /// The level set with [`ConfigBuilder::with_level`] is then ignored.
    pub fn with_global(self, global: Arc<GlobalSeverity>) -> Self {
        Self {
            global: Some(global),
            ..self
        }
    }
    /// Tint display labels with ANSI colors.
    pub fn with_color(self, colored: bool) -> Self {
        Self { colored, ..self }
    }
    /// Sets the output writer.
    pub fn with_writer<W: LogWriter + Send + 'static>(self, writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            ..self
        }
    }
    /// Sets where transaction ids are read from.
    pub fn with_context<C: ContextAccessor + 'static>(self, context: C) -> Self {
        Self {
            context: Arc::new(context),
            ..self
        }
    }
    /// Takes level and color from `config`.
    pub fn with_config(self, config: &SevlogConfig) -> Self {
        Self {
            level: config.default_severity(),
            colored: config.colored(),
            ..self
        }
    }
    /// Takes level and color from [`SEVLOG_CONFIG`].
    pub fn from_env(self) -> Self {
        self.with_config(&SEVLOG_CONFIG)
    }
    pub fn build(self) -> MainLogger {
        let Self {
            level,
            global,
            colored,
            writer,
            context,
        } = self;
        MainLogger::new(Shared {
            default: global.unwrap_or_else(|| Arc::new(GlobalSeverity::new(level))),
            writer: Mutex::new(writer),
            context,
            colored,
        })
    }
}

/// Returns a default ConfigBuilder for configuring a main logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}

#[test]
fn test_log_bridge() {
    let memory = LogMemory::new();
    let main: &'static MainLogger = Box::leak(Box::new(
        logger_config()
            .with_level("info")
            .with_writer(memory.clone())
            .with_context(NoContext)
            .build(),
    ));
    init_log_bridge(main).unwrap();
    log::info!(target: "http", "GET /health {}", 200);
    log::debug!(target: "http", "suppressed");
    log::warn!(target: "db", "slow query");
    assert_eq!(memory.stdout().len(), 1);
    assert!(memory.stdout()[0].ends_with(" [http][] INFO: GET /health 200\n"));
    assert!(memory.stderr()[0].ends_with(" [db][] WARNING: slow query\n"));

    main.set_level("error").unwrap();
    assert!(!log::log_enabled!(target: "db", log::Level::Warn));
    assert_eq!(init_log_bridge(main), Err(SevlogError::BridgeInstalled));
}

#[test]
fn test_macros_accept_mixed_values() {
    let memory = LogMemory::new();
    let main = logger_config()
        .with_writer(memory.clone())
        .with_context(NoContext)
        .build();
    let orders = main.create("orders");
    crate::info!(orders, "order", 17, "total", 12.5, None::<&str>);
    crate::error!(orders, Loggable::structured(&serde_json::json!({"code": 402})));
    crate::debug!(main, "boot", true).warning(["disk", "low"]);
    assert_eq!(memory.stdout().len(), 2);
    assert!(memory.stdout()[0].ends_with(" [orders][] INFO: order 17 total 12.5 null\n"));
    assert!(memory.stdout()[1].ends_with(" [][] DEBUG: boot true\n"));
    assert!(memory.stderr()[0].ends_with(" [orders][] ERROR: {\"code\":402}\n"));
    assert!(memory.stderr()[1].ends_with(" [][] WARNING: disk low\n"));
}

#[test]
fn test_main_loggers_share_process_severity() {
    let a = main_logger();
    let b = main_logger();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a.label(), "");
    let child = a.create("static");
    assert_eq!(child.severity(), a.severity());

    let memory = LogMemory::new();
    let other = logger_config()
        .with_level("debug")
        .with_global(process_severity())
        .with_writer(memory.clone())
        .with_context(NoContext)
        .build();
    assert_eq!(other.severity(), a.severity());
    a.set_level("warning").unwrap();
    assert_eq!(other.level(), SeverityName::Warning);
    assert_eq!(child.level(), SeverityName::Warning);
    other.set_level("error").unwrap();
    assert_eq!(a.level(), SeverityName::Error);
    assert_eq!(process_severity().get(), ERROR);
    other.create("jobs").warning(["suppressed"]);
    assert!(memory.lines().is_empty());
}

#[test]
fn test_separate_cells_stay_independent() {
    let first = logger_config().with_level("info").with_context(NoContext).build();
    let second = logger_config().with_level("info").with_context(NoContext).build();
    first.set_level("error").unwrap();
    assert_eq!(second.level(), SeverityName::Info);
}

#[test]
fn test_builder_reads_config() {
    let config = SevlogConfig {
        LEVEL: "Info".into(),
        COLOR: "yes".into(),
    };
    let memory = LogMemory::new();
    let main = logger_config()
        .with_config(&config)
        .with_writer(memory.clone())
        .with_context(NoContext)
        .build();
    assert_eq!(main.level(), SeverityName::Info);
    main.debug(["hidden"]).info(["shown"]);
    assert_eq!(memory.stdout().len(), 1);
}
