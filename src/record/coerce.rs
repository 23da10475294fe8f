//! Field coercion helpers for loosely-typed JSON objects.

use serde_json::{Map, Value};

use super::{Content, Partner};

/// String value of `key`, or empty when absent or not a string.
pub(super) fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// String elements of an array field. Non-string elements are skipped and a
/// non-array value yields an empty list.
pub(super) fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

pub(super) fn content_field(obj: &Map<String, Value>, key: &str) -> Content {
    match obj.get(key) {
        Some(Value::String(s)) => Content::Text(s.clone()),
        Some(Value::Array(_)) => Content::Paragraphs(string_list(obj, key)),
        _ => Content::default(),
    }
}

pub(super) fn partner_field(obj: &Map<String, Value>, key: &str) -> Partner {
    match obj.get(key) {
        Some(Value::Object(partner)) => Partner {
            name: string_field(partner, "name"),
            url: string_field(partner, "url"),
        },
        _ => Partner::default(),
    }
}
