//! Discord data port for guilds, channels, messages and relationships.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{ChannelId, GuildId, GuildSummary, NormalizedMessage, UserId};
use crate::domain::errors::ApiError;

/// Largest page the messages endpoint serves.
pub const MAX_MESSAGE_LIMIT: u8 = 100;

/// Options for fetching messages from a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMessagesOptions {
    /// Page size, 1..=100.
    pub limit: u8,
    /// Only return messages older than this message ID.
    pub before: Option<String>,
}

impl Default for FetchMessagesOptions {
    fn default() -> Self {
        Self {
            limit: MAX_MESSAGE_LIMIT,
            before: None,
        }
    }
}

impl FetchMessagesOptions {
    /// Sets the page size, clamped to 1..=100.
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = if limit == 0 {
            1
        } else if limit < MAX_MESSAGE_LIMIT {
            limit
        } else {
            MAX_MESSAGE_LIMIT
        };
        self
    }

    /// Pages backwards from the given message.
    #[must_use]
    pub fn before_message(mut self, message_id: impl Into<String>) -> Self {
        self.before = Some(message_id.into());
        self
    }

    /// Query string for the messages endpoint, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> String {
        match &self.before {
            Some(before) => format!("limit={}&before={before}", self.limit),
            None => format!("limit={}", self.limit),
        }
    }
}

/// A plain text message to post to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    /// Target channel.
    pub channel_id: ChannelId,
    /// Message text, sent as-is.
    pub content: String,
}

impl SendMessageRequest {
    #[must_use]
    pub fn new(channel_id: ChannelId, content: impl Into<String>) -> Self {
        Self {
            channel_id,
            content: content.into(),
        }
    }
}

/// Port for the authenticated REST operations.
///
/// Implementations authenticate with the session they hold; callers never
/// pass a token.
#[async_trait]
pub trait DiscordDataPort: Send + Sync {
    /// Fetches all guilds the user is a member of.
    async fn fetch_guilds(&self) -> Result<Vec<GuildSummary>, ApiError>;

    /// Fetches all channels of a guild, unmodified.
    async fn fetch_guild_channels(&self, guild_id: &GuildId) -> Result<Value, ApiError>;

    /// Fetches a page of messages, oldest first.
    ///
    /// A non-success status yields the single synthetic error message rather
    /// than an error.
    async fn fetch_messages(
        &self,
        channel_id: &ChannelId,
        options: FetchMessagesOptions,
    ) -> Result<Vec<NormalizedMessage>, ApiError>;

    /// Sends a text message to a channel.
    async fn send_message(&self, request: SendMessageRequest) -> Result<(), ApiError>;

    /// Sends a typing indicator to a channel.
    async fn send_typing_indicator(&self, channel_id: &ChannelId) -> Result<(), ApiError>;

    /// Fetches the user's relationships (friends, blocks, pending requests), unmodified.
    async fn fetch_relationships(&self) -> Result<Value, ApiError>;

    /// Opens (or reuses) the DM channel with a user and returns its ID.
    async fn open_dm_channel(&self, recipient_id: &UserId) -> Result<ChannelId, ApiError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 1 ; "zero_becomes_one")]
    #[test_case(50, 50 ; "in_range")]
    #[test_case(100, 100 ; "max")]
    #[test_case(250, 100 ; "clamped")]
    fn test_limit_clamping(requested: u8, expected: u8) {
        let options = FetchMessagesOptions::default().with_limit(requested);
        assert_eq!(options.limit, expected);
    }

    #[test]
    fn test_query_string() {
        assert_eq!(FetchMessagesOptions::default().query(), "limit=100");
        assert_eq!(
            FetchMessagesOptions::default()
                .with_limit(20)
                .before_message("999")
                .query(),
            "limit=20&before=999"
        );
    }
}
