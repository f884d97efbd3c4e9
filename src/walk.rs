use serde_json::Value;

use crate::sanitizer::MarkupSanitizer;

/// Rebuilds `value` with `leaf` applied to every string it contains.
///
/// Arrays stay arrays with the same length and order, objects stay objects
/// with the same keys in the same order, and `null`, booleans and numbers are
/// returned untouched. The input is consumed, so the result never aliases it.
///
/// `leaf` must be total. If it panics the panic reaches the caller.
///
/// # Examples
///
/// ```
/// use disinfect::walk;
/// use serde_json::json;
///
/// let input = json!({"array": [{"text": "ok"}, {"text": "hi"}], "n": 1});
/// let upper = walk(input, &|s: &str| s.to_uppercase());
///
/// assert_eq!(upper, json!({"array": [{"text": "OK"}, {"text": "HI"}], "n": 1}));
/// ```
pub fn walk<F>(value: Value, leaf: &F) -> Value
where
    F: Fn(&str) -> String + ?Sized,
{
    match value {
        Value::String(s) => Value::String(leaf(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| walk(v, leaf)).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, walk(v, leaf)))
                .collect(),
        ),
        scalar @ (Value::Null | Value::Bool(_) | Value::Number(_)) => scalar,
    }
}

/// Runs `sanitizer` over every string leaf of `value`.
pub fn walk_markup(value: Value, sanitizer: &dyn MarkupSanitizer) -> Value {
    walk(value, &|s: &str| sanitizer.sanitize(s))
}
