//! Conversion of raw API bodies into the client's shapes.

use serde_json::Value;

use crate::domain::entities::{ChannelId, NormalizedMessage, RawMessage};
use crate::domain::errors::ApiError;

/// Normalizes a channel messages response.
///
/// A non-2xx status replaces the whole list with the synthetic error message
/// without looking at the body. Otherwise every item is normalized and the
/// list is reversed from newest-first into chronological order.
///
/// # Errors
/// Returns error if a 2xx body is not a list of messages.
pub fn normalize_messages(status: u16, body: &[u8]) -> Result<Vec<NormalizedMessage>, ApiError> {
    if !(200..300).contains(&status) {
        return Ok(vec![NormalizedMessage::fetch_error()]);
    }

    let raw: Vec<RawMessage> = serde_json::from_slice(body)?;

    Ok(raw
        .into_iter()
        .rev()
        .map(NormalizedMessage::from)
        .collect())
}

/// Relationships are handed to callers as the API sent them.
#[must_use]
pub const fn normalize_friends(body: Value) -> Value {
    body
}

/// Reads the channel ID from a DM channel creation response.
///
/// # Errors
/// Returns error if the body is not JSON or has no `id`.
pub fn extract_channel_id(body: &[u8]) -> Result<ChannelId, ApiError> {
    let value: Value = serde_json::from_slice(body)?;

    match value.get("id") {
        Some(Value::String(id)) => Ok(ChannelId::new(id.as_str())),
        Some(Value::Number(id)) => Ok(ChannelId::new(id.to_string())),
        _ => Err(ApiError::decode("channel response has no id field")),
    }
}
