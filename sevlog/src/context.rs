use std::{cell::RefCell, collections::HashMap};

use sevlog_core::{ContextAccessor, TRANSACTION_ID_KEY};
use uuid::Uuid;

thread_local! {
    /// Bindings visible to loggers running on the current thread.
    static CONTEXT: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

/// Context bound to the current thread for the duration of a closure.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadContext;

impl ThreadContext {
    /// Binds `key` to `value` while `f` runs. The previous binding is restored afterwards.
    pub fn scope<R>(key: &str, value: impl Into<String>, f: impl FnOnce() -> R) -> R {
        let previous = CONTEXT.with(|context| {
            context
                .borrow_mut()
                .insert(key.to_string(), value.into())
        });
        let _restore = Restore {
            key: key.to_string(),
            previous,
        };
        f()
    }

    pub fn scope_transaction<R>(id: impl Into<String>, f: impl FnOnce() -> R) -> R {
        Self::scope(TRANSACTION_ID_KEY, id, f)
    }
}

impl ContextAccessor for ThreadContext {
    fn get(&self, key: &str) -> Option<String> {
        CONTEXT
            .try_with(|context| context.borrow().get(key).cloned())
            .ok()
            .flatten()
    }
}

struct Restore {
    key: String,
    previous: Option<String>,
}

impl Drop for Restore {
    fn drop(&mut self) {
        let _ = CONTEXT.try_with(|context| {
            let mut context = context.borrow_mut();
            match self.previous.take() {
                Some(value) => context.insert(self.key.clone(), value),
                None => context.remove(&self.key),
            };
        });
    }
}

/// Fresh random transaction id.
pub fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}
