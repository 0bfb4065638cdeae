//! Canonical JSON form used as the HMAC input.
//!
//! Object keys are sorted by code point at every depth; arrays keep their
//! element order. Numbers and strings are left to `serde_json`'s own
//! formatting.

use serde_json::{Map, Value};

/// Return a copy of `value` with every object's keys sorted.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(n.clone()),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::with_capacity(entries.len());
            for (key, value) in entries {
                sorted.insert(key.clone(), canonicalize(value));
            }
            Value::Object(sorted)
        }
    }
}

/// Canonicalize and serialize compactly, with no inserted whitespace.
///
/// This string is exactly what gets signed.
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}
