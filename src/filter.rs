use serde_json::Value;

use crate::whitespace::is_all_whitespace;

/// Removes the top-level entries of `value` that satisfy `predicate`.
///
/// - On an object, every key whose value matches is deleted; the surviving
///   keys keep their order.
/// - On an array, every matching element is dropped and the rest are
///   compacted, keeping their relative order. No holes are left behind.
/// - Any other value is returned unchanged.
///
/// Only the outermost container is filtered. Nested arrays and objects are
/// kept as they are, even when they hold matching values themselves.
///
/// # Examples
///
/// ```
/// use disinfect::{filter_out, is_empty};
/// use serde_json::json;
///
/// let list = filter_out(json!(["a", "", null, "b"]), is_empty);
/// assert_eq!(list, json!(["a", "b"]));
///
/// let map = filter_out(json!({"a": "", "b": "c", "n": {"x": ""}}), is_empty);
/// assert_eq!(map, json!({"b": "c", "n": {"x": ""}}));
/// ```
pub fn filter_out<P>(value: Value, predicate: P) -> Value
where
    P: Fn(&Value) -> bool,
{
    match value {
        Value::Array(mut items) => {
            items.retain(|v| !predicate(v));
            Value::Array(items)
        }
        Value::Object(mut map) => {
            map.retain(|_, v| !predicate(&*v));
            Value::Object(map)
        }
        other => other,
    }
}

/// Matches the values removed by empty-value elision: `""` and `null`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Matches the values removed by whitespace elision.
pub fn is_whitespace(value: &Value) -> bool {
    is_all_whitespace(value)
}
