//! API response helpers
//!
//! The admin API is not uniform: list endpoints answer either with a bare
//! array or with an object that wraps the array under the entity name
//! (`{"bookings": [...]}`), and error bodies carry `message` or `error`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic acknowledgement body returned by mutating endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decode a list response, accepting a bare array or `{ <key>: [...] }`.
///
/// Any other shape decodes as an empty list.
pub fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        Value::Object(mut map) => match map.remove(key) {
            Some(list @ Value::Array(_)) => serde_json::from_value(list),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

/// Number of records in a list response.
///
/// Bare array length, wrapped array length, then the `count` field, else 0.
pub fn count_of(value: &Value, key: &str) -> u64 {
    if let Some(list) = value.as_array() {
        return list.len() as u64;
    }
    if let Some(list) = value.get(key).and_then(Value::as_array) {
        return list.len() as u64;
    }
    value.get("count").and_then(Value::as_u64).unwrap_or(0)
}

/// Extract a human-readable message from an error response body
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}
