/// Builds a `[Loggable; N]` from heterogeneous values.
///
/// ```rust
/// let values = sevlog::loggables!["order", 42, 1.5, true];
/// assert_eq!(sevlog::format_messages(&values), "order 42 1.5 true");
/// ```
#[macro_export]
macro_rules! loggables {
    ($($value:expr),* $(,)?) => {
        [$($crate::Loggable::from($value)),*]
    };
}

/// Logs heterogeneous values at debug level: `debug!(logger, "a", 1)`.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.debug($crate::loggables![$($value),+])
    };
}

/// Logs heterogeneous values at info level: `info!(logger, "a", 1)`.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.info($crate::loggables![$($value),+])
    };
}

/// Logs heterogeneous values at warning level: `warning!(logger, "a", 1)`.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.warning($crate::loggables![$($value),+])
    };
}

/// Logs heterogeneous values at error level: `error!(logger, "a", 1)`.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.error($crate::loggables![$($value),+])
    };
}
