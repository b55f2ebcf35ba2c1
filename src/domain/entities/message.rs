//! Message shapes: raw API items and their normalized form.

use serde::{Deserialize, Serialize};

use crate::domain::serde_utils::snowflake_string;

/// Content shown for messages with no text (attachments, calls, embeds).
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "[(call/image/other)]";

/// Author name used by the synthetic error message.
pub const SYSTEM_AUTHOR: &str = "System";

/// Text of the synthetic error message.
pub const FETCH_ERROR_CONTENT: &str =
    "Error. This may be a forum channel, or you're not allowed to view the content.";

/// ID carried by the synthetic error message.
pub const ERROR_MESSAGE_ID: &str = "0";

/// Author object of a raw message.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthor {
    /// Account handle.
    pub username: String,
    /// Global display name, if the user set one.
    #[serde(default)]
    pub global_name: Option<String>,
}

impl RawAuthor {
    /// Returns the global display name when set and non-empty, else the handle.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Message item as returned by the channel messages endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    /// Message snowflake.
    #[serde(deserialize_with = "snowflake_string")]
    pub id: String,
    /// Text content; empty for attachment-only and call messages.
    #[serde(default)]
    pub content: Option<String>,
    /// Message author.
    pub author: RawAuthor,
}

/// Message in the shape the client displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    /// Message ID; `"0"` for the synthetic error message.
    pub id: String,
    /// Name shown next to the message.
    pub display_name: String,
    /// Text shown for the message.
    pub content: String,
}

impl NormalizedMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            content: content.into(),
        }
    }

    /// The placeholder that replaces a whole message list when fetching fails.
    #[must_use]
    pub fn fetch_error() -> Self {
        Self::new(ERROR_MESSAGE_ID, SYSTEM_AUTHOR, FETCH_ERROR_CONTENT)
    }

    /// Returns whether this is the synthetic error message.
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        self.id == ERROR_MESSAGE_ID && self.display_name == SYSTEM_AUTHOR
    }
}

impl From<RawMessage> for NormalizedMessage {
    fn from(raw: RawMessage) -> Self {
        let display_name = raw.author.display_name().to_string();
        let content = match raw.content {
            Some(content) if !content.is_empty() => content,
            _ => EMPTY_CONTENT_PLACEHOLDER.to_string(),
        };

        Self {
            id: raw.id,
            display_name,
            content,
        }
    }
}
