/// Context key carrying the transaction id of the current request.
pub const TRANSACTION_ID_KEY: &str = "transactionId";

/// Ambient key/value lookup scoped to the current logical request.
///
/// Implementations own the scoping mechanism (thread or task local storage).
/// A missing binding is `None`, never an error.
pub trait ContextAccessor: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Context without any binding.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContext;

impl ContextAccessor for NoContext {
    fn get(&self, _: &str) -> Option<String> {
        None
    }
}

/// Transaction id bound in `context`, or an empty string.
pub fn transaction_id(context: &dyn ContextAccessor) -> String {
    context.get(TRANSACTION_ID_KEY).unwrap_or_default()
}

#[test]
fn test_missing_transaction_id_is_empty() {
    assert_eq!(transaction_id(&NoContext), "");

    struct Fixed;
    impl ContextAccessor for Fixed {
        fn get(&self, key: &str) -> Option<String> {
            (key == TRANSACTION_ID_KEY).then(|| "tx-42".to_string())
        }
    }
    assert_eq!(transaction_id(&Fixed), "tx-42");
}
