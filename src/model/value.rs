//! Tolerant accessors over raw backend JSON.
//!
//! Backend payloads are loosely typed: fields go missing, arrays carry
//! `null`/`""` holes, numbers show up where strings were expected. Everything
//! here treats "wrong shape" the same as "absent" so callers never fail.

use serde_json::Value;

/// Truthiness as the backend means it: `null`, `false`, `0`, `NaN` and `""`
/// are holes, everything else is a value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Scalar rendered as text. Objects and arrays are not text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// First non-empty text found under any of `keys`.
pub(crate) fn text_field(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(scalar_text)
}

/// Truthy entries of the array under `key`, in order. A non-array is empty.
pub(crate) fn truthy_items<'a>(obj: &'a Value, key: &str) -> Vec<&'a Value> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.iter().filter(|v| is_truthy(v)).collect(),
        _ => Vec::new(),
    }
}

/// Truthy entries of the first array found under any of `keys`.
pub(crate) fn truthy_items_any<'a>(obj: &'a Value, keys: &[&str]) -> Vec<&'a Value> {
    keys.iter()
        .find(|key| matches!(obj.get(**key), Some(Value::Array(_))))
        .map(|key| truthy_items(obj, key))
        .unwrap_or_default()
}

/// Non-empty strings of the array under `key`.
pub(crate) fn string_items(obj: &Value, key: &str) -> Vec<String> {
    truthy_items(obj, key)
        .into_iter()
        .filter_map(scalar_text)
        .collect()
}

/// Number or numeric string.
pub(crate) fn number_field(obj: &Value, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Nested `data` object when the section wraps its payload, else the section itself.
pub(crate) fn payload(obj: &Value) -> &Value {
    match obj.get("data") {
        Some(data @ Value::Object(_)) => data,
        _ => obj,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness_matches_backend_holes() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_string_items_drop_holes_and_keep_order() {
        let obj = json!({ "images": ["a.png", null, "", "b.png", false, "c.png"] });
        assert_eq!(string_items(&obj, "images"), vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_wrong_shape_is_absent() {
        let obj = json!({ "images": "not-an-array", "title": {"nested": true} });
        assert!(string_items(&obj, "images").is_empty());
        assert_eq!(text_field(&obj, &["title"]), None);
        assert_eq!(number_field(&json!({"s": "0.5"}), "s"), Some(0.5));
    }
}
