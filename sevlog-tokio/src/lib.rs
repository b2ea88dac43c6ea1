//! # sevlog-tokio
//! Task scoped transaction ids for sevlog loggers running inside tokio runtimes.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! sevlog-tokio = "0.1.0"
//! tokio = {version = "1.40.0", features = ["full"]}
//! ```
//!
//! ```rust
//! use sevlog_tokio::{TaskContext, main_logger};
//!
//! #[tokio::main]
//! async fn main() {
//!     let payments = main_logger().create("payments");
//!     TaskContext::scope_transaction("tx-42", async move {
//!         payments.info(["charging card"]);
//!         // every line logged inside this future carries [tx-42]
//!     })
//!     .await;
//! }
//! ```
//!
//! ## Concurrent requests
//! ```rust
//! use sevlog_tokio::{TaskContext, main_logger};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handles: Vec<_> = (0..5)
//!         .map(|i| {
//!             tokio::spawn(TaskContext::scope_transaction(format!("tx-{i}"), async move {
//!                 main_logger().create("worker").warning(["handling request", "slow"]);
//!             }))
//!         })
//!         .collect();
//!     for h in handles {
//!         h.await.unwrap();
//!     }
//! }
//! ```

use std::{collections::HashMap, future::Future, sync::LazyLock};

use sevlog::{ContextAccessor, MainLogger, TRANSACTION_ID_KEY, logger_config, process_severity};

pub use sevlog::new_transaction_id;

tokio::task_local! {
    /// Bindings visible to loggers polled inside the current task scope.
    static CONTEXT: HashMap<String, String>;
}

/// Context bound to the current tokio task for the duration of a future.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskContext;

impl TaskContext {
    /// Runs `f` with `key` bound to `value`, on top of the enclosing scope's bindings.
    pub async fn scope<F: Future>(key: &str, value: impl Into<String>, f: F) -> F::Output {
        let mut bindings = CONTEXT.try_with(Clone::clone).unwrap_or_default();
        bindings.insert(key.to_string(), value.into());
        CONTEXT.scope(bindings, f).await
    }

    pub async fn scope_transaction<F: Future>(id: impl Into<String>, f: F) -> F::Output {
        Self::scope(TRANSACTION_ID_KEY, id, f).await
    }
}

impl ContextAccessor for TaskContext {
    fn get(&self, key: &str) -> Option<String> {
        CONTEXT
            .try_with(|bindings| bindings.get(key).cloned())
            .ok()
            .flatten()
    }
}

/// Process-wide main logger, configured from `SEVLOG_*` variables.
static MAIN_LOGGER: LazyLock<MainLogger> = LazyLock::new(|| {
    logger_config()
        .from_env()
        .with_global(process_severity())
        .with_context(TaskContext)
        .build()
});

/// The process-wide main logger reading transaction ids from [`TaskContext`].
/// It shares its level with [`sevlog::main_logger`].
pub fn main_logger() -> &'static MainLogger {
    &MAIN_LOGGER
}
