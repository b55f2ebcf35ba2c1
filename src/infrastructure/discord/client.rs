//! Discord REST API client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::dto::{CreateDmPayload, CreateMessagePayload, LoginPayload, TotpPayload};
use super::routes;
use super::transport::ApiTransport;
use crate::domain::entities::{
    ChannelId, GuildId, GuildSummary, LoginOutcome, LoginTicket, NormalizedMessage, UserId,
};
use crate::domain::errors::{ApiError, AuthError};
use crate::domain::ports::{
    AuthPort, DiscordDataPort, FetchMessagesOptions, HttpMethod, HttpPort, HttpResponse,
    SendMessageRequest,
};
use crate::domain::services::{extract_channel_id, normalize_friends, normalize_messages};
use crate::domain::session::SessionState;

/// Discord REST client for login and data operations.
#[derive(Clone)]
pub struct DiscordClient {
    transport: ApiTransport,
}

impl DiscordClient {
    /// Creates a client that authenticates with `session`.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, session: Arc<SessionState>) -> Self {
        Self {
            transport: ApiTransport::new(http, session),
        }
    }

    fn to_body(payload: &impl Serialize) -> Result<Value, ApiError> {
        Ok(serde_json::to_value(payload)?)
    }

    async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.transport.request(HttpMethod::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<HttpResponse, ApiError> {
        self.transport.request(HttpMethod::Post, path, body).await
    }

    fn login_unavailable(status: u16) -> AuthError {
        match status {
            502..=504 => AuthError::network("Discord API is temporarily unavailable"),
            _ => AuthError::network(format!("Discord API returned {status}")),
        }
    }
}

#[async_trait]
impl AuthPort for DiscordClient {
    async fn submit_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        debug!("Submitting credentials to login endpoint");

        let body = Self::to_body(&LoginPayload::new(email, password))?;
        let response = self
            .transport
            .request_anonymous(HttpMethod::Post, routes::LOGIN, Some(body))
            .await?;

        if response.status >= 500 {
            warn!(status = response.status, "Login endpoint unavailable");
            return Err(Self::login_unavailable(response.status));
        }

        let outcome = LoginOutcome::parse_login_response(&response.body)?;
        match &outcome {
            LoginOutcome::Authenticated(_) => info!("Login returned a session token"),
            LoginOutcome::NeedsSecondFactor(_) => info!("Login requires a TOTP code"),
            LoginOutcome::Failed(failure) => {
                warn!(status = response.status, reason = %failure, "Login failed");
            }
        }

        Ok(outcome)
    }

    async fn submit_totp(
        &self,
        ticket: &LoginTicket,
        code: &str,
    ) -> Result<LoginOutcome, AuthError> {
        debug!("Submitting TOTP code");

        let body = Self::to_body(&TotpPayload {
            ticket: ticket.as_str(),
            code,
        })?;
        let response = self
            .transport
            .request_anonymous(HttpMethod::Post, routes::TOTP, Some(body))
            .await?;

        if response.status >= 500 {
            warn!(status = response.status, "TOTP endpoint unavailable");
            return Err(Self::login_unavailable(response.status));
        }

        let outcome = LoginOutcome::from_totp_response(response.status, &response.body)?;
        if let LoginOutcome::Failed(failure) = &outcome {
            warn!(status = response.status, reason = %failure, "TOTP verification failed");
        } else {
            info!("TOTP verification succeeded");
        }

        Ok(outcome)
    }
}

#[async_trait]
impl DiscordDataPort for DiscordClient {
    async fn fetch_guilds(&self) -> Result<Vec<GuildSummary>, ApiError> {
        let guilds: Vec<GuildSummary> = self.get(routes::GUILDS).await?.error_for_status()?.json()?;
        debug!(count = guilds.len(), "Fetched guilds");
        Ok(guilds)
    }

    async fn fetch_guild_channels(&self, guild_id: &GuildId) -> Result<Value, ApiError> {
        let channels: Value = self
            .get(&routes::guild_channels(guild_id))
            .await?
            .error_for_status()?
            .json()?;
        debug!(%guild_id, "Fetched guild channels");
        Ok(channels)
    }

    async fn fetch_messages(
        &self,
        channel_id: &ChannelId,
        options: FetchMessagesOptions,
    ) -> Result<Vec<NormalizedMessage>, ApiError> {
        let path = format!("{}?{}", routes::channel_messages(channel_id), options.query());
        let response = self.get(&path).await?;

        if !response.is_success() {
            warn!(
                %channel_id,
                status = response.status,
                "Message history unavailable, substituting error message"
            );
        }

        let messages = normalize_messages(response.status, &response.body)?;
        debug!(%channel_id, count = messages.len(), "Fetched messages");
        Ok(messages)
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<(), ApiError> {
        let body = Self::to_body(&CreateMessagePayload {
            content: &request.content,
        })?;

        self.post(&routes::channel_messages(&request.channel_id), Some(body))
            .await?
            .error_for_status()?;

        debug!(channel_id = %request.channel_id, "Message sent");
        Ok(())
    }

    async fn send_typing_indicator(&self, channel_id: &ChannelId) -> Result<(), ApiError> {
        self.post(&routes::typing(channel_id), None)
            .await?
            .error_for_status()?;

        debug!(%channel_id, "Typing indicator sent");
        Ok(())
    }

    async fn fetch_relationships(&self) -> Result<Value, ApiError> {
        let body: Value = self
            .get(routes::RELATIONSHIPS)
            .await?
            .error_for_status()?
            .json()?;
        Ok(normalize_friends(body))
    }

    async fn open_dm_channel(&self, recipient_id: &UserId) -> Result<ChannelId, ApiError> {
        let body = Self::to_body(&CreateDmPayload {
            recipient_id: recipient_id.as_str(),
        })?;

        let response = self
            .post(routes::DM_CHANNELS, Some(body))
            .await?
            .error_for_status()?;

        let channel_id = extract_channel_id(&response.body)?;
        debug!(%recipient_id, %channel_id, "Resolved DM channel");
        Ok(channel_id)
    }
}
