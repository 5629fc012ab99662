//! Project-specific utilities live here.

use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Current UTC time as an RFC 3339 string.
pub fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
}

/// Whether a submitted JSON value counts as set.
///
/// `null`, `false`, zero, and empty strings, arrays or objects are unset.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values_are_unset() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&value), "{value} should be unset");
        }
        for value in [json!(true), json!(1), json!(-2.5), json!("false"), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&value), "{value} should be set");
        }
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let stamp = timestamp();
        assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok());
    }
}
