//! Helpers for reading loosely shaped JSON payloads
//!
//! Source APIs only agree on being JSON, so adapters and the paginator
//! address fields with dot-separated paths rather than typed structs.

mod path;

pub use path::{lookup, lookup_str};

use serde_json::Value;

/// Returns true if a payload carries nothing usable
///
/// `null`, `{}` and `[]` all count as empty; scalars never do.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    }
}
