//! Authenticated chat operations used by the client surface.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::entities::{ChannelId, GuildId, GuildSummary, NormalizedMessage, UserId};
use crate::domain::errors::ApiError;
use crate::domain::ports::{
    DiscordDataPort, FetchMessagesOptions, IconCachePort, MAX_MESSAGE_LIMIT, SendMessageRequest,
};

/// Chat operations over the data port and the icon cache.
#[derive(Clone)]
pub struct ChatService {
    data: Arc<dyn DiscordDataPort>,
    icons: Arc<dyn IconCachePort>,
    message_limit: u8,
}

impl ChatService {
    /// Creates a service with the full 100 message page.
    #[must_use]
    pub fn new(data: Arc<dyn DiscordDataPort>, icons: Arc<dyn IconCachePort>) -> Self {
        Self {
            data,
            icons,
            message_limit: MAX_MESSAGE_LIMIT,
        }
    }

    /// Default page size for [`Self::fetch_messages`].
    #[must_use]
    pub fn with_message_limit(mut self, limit: u8) -> Self {
        self.message_limit = limit.clamp(1, MAX_MESSAGE_LIMIT);
        self
    }

    /// Lists guilds and makes sure each icon is cached.
    ///
    /// # Errors
    /// Returns error if the guild list cannot be fetched. Icon failures are not errors.
    #[instrument(skip(self))]
    pub async fn list_guilds(&self) -> Result<Vec<GuildSummary>, ApiError> {
        let guilds = self.data.fetch_guilds().await?;
        Ok(self.icons.ensure_guild_icons(guilds).await)
    }

    /// Lists a guild's channels as returned by the API.
    ///
    /// # Errors
    /// Returns error on transport failure or non-success status.
    pub async fn list_guild_channels(&self, guild_id: &GuildId) -> Result<Value, ApiError> {
        self.data.fetch_guild_channels(guild_id).await
    }

    /// Fetches messages oldest first, optionally before a message.
    ///
    /// # Errors
    /// Returns error on transport failure or an undecodable body.
    pub async fn fetch_messages(
        &self,
        channel_id: &ChannelId,
        limit: Option<u8>,
        before: Option<String>,
    ) -> Result<Vec<NormalizedMessage>, ApiError> {
        let mut options =
            FetchMessagesOptions::default().with_limit(limit.unwrap_or(self.message_limit));
        if let Some(before) = before {
            options = options.before_message(before);
        }

        debug!(%channel_id, limit = options.limit, "Fetching messages");
        self.data.fetch_messages(channel_id, options).await
    }

    /// Sends a text message.
    ///
    /// # Errors
    /// Returns error on transport failure or non-success status.
    pub async fn send_message(
        &self,
        channel_id: ChannelId,
        content: impl Into<String> + Send,
    ) -> Result<(), ApiError> {
        self.data
            .send_message(SendMessageRequest::new(channel_id, content))
            .await
    }

    /// Shows the typing indicator.
    ///
    /// # Errors
    /// Returns error on transport failure or non-success status.
    pub async fn send_typing(&self, channel_id: &ChannelId) -> Result<(), ApiError> {
        self.data.send_typing_indicator(channel_id).await
    }

    /// Lists relationships as returned by the API.
    ///
    /// # Errors
    /// Returns error on transport failure or non-success status.
    pub async fn list_friends(&self) -> Result<Value, ApiError> {
        self.data.fetch_relationships().await
    }

    /// Returns the DM channel with a user, creating it if needed.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status or a response without an ID.
    pub async fn resolve_dm_channel(&self, user_id: &UserId) -> Result<ChannelId, ApiError> {
        self.data.open_dm_channel(user_id).await
    }

    /// Where a guild's icon is cached.
    #[must_use]
    pub fn guild_icon_path(&self, guild_id: &GuildId) -> PathBuf {
        self.icons.icon_path(guild_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{RecordingIconCache, StubDataPort};
    use serde_json::json;

    fn service(data: StubDataPort) -> (ChatService, Arc<StubDataPort>, Arc<RecordingIconCache>) {
        let data = Arc::new(data);
        let icons = Arc::new(RecordingIconCache::new());
        (
            ChatService::new(data.clone(), icons.clone()),
            data,
            icons,
        )
    }

    #[tokio::test]
    async fn test_list_guilds_runs_icon_cache() {
        let guilds = vec![
            GuildSummary::from_raw(json!({"id": "1", "name": "a", "icon": "x"})),
            GuildSummary::from_raw(json!({"id": "2", "name": "b", "icon": null})),
        ];
        let (service, _, icons) = service(StubDataPort::new().with_guilds(guilds.clone()));

        let listed = service.list_guilds().await.unwrap();

        assert_eq!(listed, guilds);
        assert_eq!(icons.calls(), 1);
    }

    #[tokio::test]
    async fn test_list_guilds_error_skips_icon_cache() {
        let (service, _, icons) = service(StubDataPort::new().failing_with(401));

        let result = service.list_guilds().await;

        assert!(matches!(result, Err(ref e) if e.is_unauthorized()));
        assert_eq!(icons.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_messages_uses_configured_limit() {
        let (service, data, _) = service(StubDataPort::new());
        let service = service.with_message_limit(30);

        service
            .fetch_messages(&ChannelId::new("5"), None, Some("77".to_string()))
            .await
            .unwrap();
        service
            .fetch_messages(&ChannelId::new("5"), Some(200), None)
            .await
            .unwrap();

        let requests = data.message_requests();
        assert_eq!(requests[0].1, FetchMessagesOptions::default().with_limit(30).before_message("77"));
        assert_eq!(requests[1].1.limit, 100);
    }

    #[tokio::test]
    async fn test_fetch_messages_returns_port_messages() {
        let messages = vec![
            NormalizedMessage::new("2", "Bob", "hi"),
            NormalizedMessage::new("1", "Alice", "hello"),
        ];
        let (service, _, _) = service(StubDataPort::new().with_messages(messages.clone()));

        let fetched = service
            .fetch_messages(&ChannelId::new("5"), None, None)
            .await
            .unwrap();

        assert_eq!(fetched, messages);
    }

    #[tokio::test]
    async fn test_fetch_messages_error_list_passes_through() {
        let (service, _, _) = service(StubDataPort::new().failing_with(403));

        let messages = service
            .fetch_messages(&ChannelId::new("5"), None, None)
            .await
            .unwrap();

        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_fetch_error());
    }

    #[tokio::test]
    async fn test_send_and_typing() {
        let (service, data, _) = service(StubDataPort::new());

        service.send_typing(&ChannelId::new("9")).await.unwrap();
        service.send_message(ChannelId::new("9"), "hello").await.unwrap();

        assert_eq!(data.typing(), vec![ChannelId::new("9")]);
        assert_eq!(data.sent(), vec![SendMessageRequest::new(ChannelId::new("9"), "hello")]);
    }

    #[tokio::test]
    async fn test_resolve_dm_channel() {
        let (service, _, _) = service(StubDataPort::new());

        let channel = service.resolve_dm_channel(&UserId::new("3")).await.unwrap();
        assert_eq!(channel, ChannelId::new("dm-3"));
    }

    #[test]
    fn test_icon_path_from_cache() {
        let (service, _, _) = service(StubDataPort::new());
        assert_eq!(
            service.guild_icon_path(&GuildId::new("4")),
            PathBuf::from("servers").join("4.png")
        );
    }
}
