//! Conversion of heterogeneous loggable values into one message string.

use std::{backtrace::Backtrace, backtrace::BacktraceStatus, error::Error, fmt};

use serde::Serialize;
use serde_json::Value;

/// Rendered in place of a value that could not be serialized.
pub const UNSERIALIZABLE: &str = "[unserializable]";

/// A single argument of a log call.
#[derive(Debug, Clone, PartialEq)]
pub enum Loggable {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    /// Error-like value. `stack` wins over `message` when present.
    Error {
        message: String,
        stack: Option<String>,
    },
    /// Structured value, rendered as compact JSON.
    Value(Value),
}

impl Loggable {
    /// Captures an error and, when it has causes, its whole `source()` chain as the stack text.
    pub fn error(err: &(dyn Error + 'static)) -> Self {
        let message = err.to_string();
        let mut stack = None;
        let mut source = err.source();
        while let Some(cause) = source {
            let text = stack.get_or_insert_with(|| message.clone());
            text.push_str("\n    caused by: ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        Loggable::Error { message, stack }
    }

    /// Uses `backtrace` as the stack text if it was actually captured.
    pub fn with_backtrace(err: &(dyn Error + 'static), backtrace: &Backtrace) -> Self {
        let message = err.to_string();
        let stack = match backtrace.status() {
            BacktraceStatus::Captured => Some(format!("{message}\n{backtrace}")),
            _ => None,
        };
        Loggable::Error { message, stack }
    }

    pub fn error_with_stack(message: impl Into<String>, stack: Option<String>) -> Self {
        Loggable::Error {
            message: message.into(),
            stack,
        }
    }

    /// Never fails: values serde cannot represent become [`UNSERIALIZABLE`].
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Loggable::Value(value),
            Err(_) => Loggable::Str(UNSERIALIZABLE.into()),
        }
    }
}

impl fmt::Display for Loggable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loggable::Null => f.write_str("null"),
            Loggable::Bool(b) => write!(f, "{b}"),
            Loggable::Int(i) => write!(f, "{i}"),
            Loggable::UInt(u) => write!(f, "{u}"),
            Loggable::Float(x) => write!(f, "{x}"),
            Loggable::Str(s) => f.write_str(s),
            Loggable::Error {
                stack: Some(stack), ..
            } => f.write_str(stack),
            Loggable::Error { message, .. } => f.write_str(message),
            // A string at the top level is not a composite, print it bare.
            Loggable::Value(Value::String(s)) => f.write_str(s),
            Loggable::Value(value) => write!(f, "{value}"),
        }
    }
}

/// Joins the rendering of each value with a single space, in argument order.
pub fn format_messages(messages: &[Loggable]) -> String {
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<&str> for Loggable {
    fn from(s: &str) -> Self {
        Loggable::Str(s.into())
    }
}

impl From<String> for Loggable {
    fn from(s: String) -> Self {
        Loggable::Str(s)
    }
}

impl From<&String> for Loggable {
    fn from(s: &String) -> Self {
        Loggable::Str(s.clone())
    }
}

impl From<char> for Loggable {
    fn from(c: char) -> Self {
        Loggable::Str(c.into())
    }
}

impl From<bool> for Loggable {
    fn from(b: bool) -> Self {
        Loggable::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Loggable {
            fn from(i: $t) -> Self {
                Loggable::Int(i as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Loggable {
            fn from(u: $t) -> Self {
                Loggable::UInt(u as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Loggable {
    fn from(x: f32) -> Self {
        Loggable::Float(x as f64)
    }
}

impl From<f64> for Loggable {
    fn from(x: f64) -> Self {
        Loggable::Float(x)
    }
}

impl From<Value> for Loggable {
    fn from(value: Value) -> Self {
        Loggable::Value(value)
    }
}

impl<T: Into<Loggable>> From<Option<T>> for Loggable {
    fn from(value: Option<T>) -> Self {
        value.map_or(Loggable::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[derive(Debug)]
    struct Io;
    impl fmt::Display for Io {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection reset")
        }
    }
    impl Error for Io {}

    #[derive(Debug)]
    struct Query(Io);
    impl fmt::Display for Query {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("query failed")
        }
    }
    impl Error for Query {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_scalars_use_their_natural_form() {
        assert_eq!(format_messages(&["cache hit".into()]), "cache hit");
        assert_eq!(format_messages(&[42i32.into()]), "42");
        assert_eq!(format_messages(&[(-7i8).into()]), "-7");
        assert_eq!(format_messages(&[1.5f64.into()]), "1.5");
        assert_eq!(format_messages(&[true.into()]), "true");
        assert_eq!(format_messages(&[Option::<u8>::None.into()]), "null");
    }

    #[test]
    fn test_values_joined_in_order() {
        let messages = [
            Loggable::from("user"),
            Loggable::from(7u32),
            Loggable::from(Some("logged in")),
        ];
        assert_eq!(format_messages(&messages), "user 7 logged in");
        assert_eq!(format_messages(&[]), "");
    }

    #[test]
    fn test_error_prefers_stack() {
        let plain = Loggable::error(&Io);
        assert_eq!(format_messages(&[plain]), "connection reset");

        let nested = Loggable::error(&Query(Io));
        assert_eq!(
            format_messages(&[nested]),
            "query failed\n    caused by: connection reset"
        );

        let explicit = Loggable::error_with_stack("boom", Some("boom\n  at main".into()));
        assert_eq!(format_messages(&[explicit]), "boom\n  at main");
    }

    #[test]
    fn test_disabled_backtrace_falls_back_to_message() {
        let loggable = Loggable::with_backtrace(&Io, &Backtrace::disabled());
        assert_eq!(
            loggable,
            Loggable::Error {
                message: "connection reset".into(),
                stack: None
            }
        );
    }

    #[test]
    fn test_structured_values_render_as_json() {
        let value = Loggable::from(json!({"id": 3, "tags": ["a", "b"]}));
        assert_eq!(format_messages(&[value]), r#"{"id":3,"tags":["a","b"]}"#);

        let mut map = BTreeMap::new();
        map.insert("amount", 12);
        assert_eq!(
            format_messages(&[Loggable::structured(&map)]),
            r#"{"amount":12}"#
        );
        assert_eq!(format_messages(&[json!(null).into()]), "null");
    }

    #[test]
    fn test_unserializable_values_degrade() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "tuple keys are not JSON");
        assert_eq!(
            format_messages(&[Loggable::structured(&map), "after".into()]),
            "[unserializable] after"
        );
    }
}
