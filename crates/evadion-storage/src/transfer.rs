//! Export/import envelope for bookmark and history files
//!
//! Exported files look like `{"version": 1, "exportedAt": "...", "<key>": [...]}`.
//! Imports accept either that envelope or the bare array.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::Result;

pub const EXPORT_VERSION: u32 = 1;

/// Wrap a collection in the export envelope and pretty-print it.
pub fn export_envelope<T: Serialize>(collection_key: &str, items: &[T]) -> Result<String> {
    let mut doc = Map::new();
    doc.insert("version".to_string(), Value::from(EXPORT_VERSION));
    doc.insert(
        "exportedAt".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    doc.insert(collection_key.to_string(), serde_json::to_value(items)?);
    Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
}

/// Extract the raw entry list from an imported document.
///
/// Returns `None` only when the envelope carries the key with a non-array
/// value. Any other shape without a list is treated as an empty import.
pub fn import_entries(doc: Value, collection_key: &str) -> Option<Vec<Value>> {
    match doc {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(collection_key) {
            Some(Value::Array(items)) => Some(items),
            Some(Value::Null) | None => Some(Vec::new()),
            Some(_) => None,
        },
        _ => Some(Vec::new()),
    }
}

/// Lenient string coercion for imported fields: strings are trimmed,
/// numbers and booleans are stringified, everything else is empty.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
