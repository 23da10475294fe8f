//! Index response handling.

use serde::Serialize;
use serde_json::Value;

/// One record's detail location and display path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IndexEntry {
    pub url: String,
    pub pathname: String,
}

impl IndexEntry {
    /// Strict coercion: both `url` and `pathname` must be non-empty strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let url = non_empty_str(value, "url")?;
        let pathname = non_empty_str(value, "pathname")?;
        Some(Self {
            url: url.to_string(),
            pathname: pathname.to_string(),
        })
    }
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// The raw entry list of an index body.
///
/// Accepts a bare array, `{"data": [..]}` or `{"items": [..]}`. Any other
/// shape is an empty index.
pub fn raw_entries(body: &Value) -> &[Value] {
    match body {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("data")
            .and_then(Value::as_array)
            .or_else(|| obj.get("items").and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Extract well-formed entries, dropping malformed ones with a warning.
pub fn extract_entries(body: &Value) -> Vec<IndexEntry> {
    let raw = raw_entries(body);
    let entries: Vec<IndexEntry> = raw.iter().filter_map(IndexEntry::from_value).collect();

    let dropped = raw.len() - entries.len();
    if dropped > 0 {
        tracing::warn!(dropped, "skipped malformed index entries");
    }
    entries
}
