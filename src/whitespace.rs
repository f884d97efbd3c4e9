use serde_json::Value;

/// Returns `true` if `c` belongs to the whitespace set used for value elision.
///
/// The set is explicit rather than `char::is_whitespace`: it adds the
/// Mongolian vowel separator (U+180E) and the byte-order mark (U+FEFF), and
/// leaves out U+0085 (NEL).
pub fn is_whitespace_char(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{180E}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Returns `true` only for a string value made up entirely of whitespace.
///
/// The empty string counts as all-whitespace. Numbers, booleans, `null` and
/// containers are never whitespace, whatever their textual form would be.
///
/// # Examples
///
/// ```
/// use disinfect::is_all_whitespace;
/// use serde_json::json;
///
/// assert!(is_all_whitespace(&json!(" \t\u{00A0}\u{2028}")));
/// assert!(is_all_whitespace(&json!("")));
/// assert!(!is_all_whitespace(&json!(" x ")));
/// assert!(!is_all_whitespace(&json!(0)));
/// ```
pub fn is_all_whitespace(value: &Value) -> bool {
    match value {
        Value::String(s) => s.chars().all(is_whitespace_char),
        _ => false,
    }
}
