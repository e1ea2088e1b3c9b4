//! Lenient serde adapters for loosely-typed server payloads.
//!
//! Malformed fragments decode as absent instead of failing the enclosing
//! payload. Used through `#[serde(default, deserialize_with = "...")]`.

use crate::model::id::EntityId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts string or numeric ids; anything else is "no identifier".
pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => EntityId::new(text),
        Some(Value::Number(number)) => EntityId::new(number.to_string()),
        _ => None,
    })
}

/// Decodes one nested value, or `None` when it has the wrong shape.
pub(crate) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// Decodes a list, dropping malformed elements. Non-lists are absent.
pub(crate) fn sequence<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(decode_items(items)),
        _ => None,
    })
}

/// Like [`sequence`] but for required root lists; non-lists become empty.
pub(crate) fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => decode_items(items),
        _ => Vec::new(),
    })
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() < total {
        log::debug!(
            "event=payload_decode module=model status=skip dropped={} total={}",
            total - decoded.len(),
            total
        );
    }
    decoded
}
