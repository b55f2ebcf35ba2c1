//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::application::services::{LoginFlow, LoginState};
use crate::domain::entities::{AuthToken, LoginTicket};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, TokenStoragePort};
use crate::domain::session::SessionState;

/// Handles user authentication workflow.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn TokenStoragePort>,
    session: Arc<SessionState>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn TokenStoragePort>,
        session: Arc<SessionState>,
    ) -> Self {
        Self {
            auth_port,
            storage_port,
            session,
        }
    }

    /// Executes login with provided request.
    ///
    /// When the account asks for a TOTP code and the request carries none,
    /// returns [`LoginResponse::NeedsSecondFactor`]; finish with
    /// [`Self::complete_second_factor`].
    ///
    /// # Errors
    /// Returns error if the service could not be reached.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        debug!(email = %request.email, "Attempting login");

        let mut flow = LoginFlow::new(self.auth_port.clone());
        let state = flow
            .submit_credentials(&request.email, &request.password)
            .await?;

        let state = match (state, request.totp_code.as_deref()) {
            (LoginState::AwaitingSecondFactor(ticket), None) => {
                info!("Waiting for TOTP code");
                return Ok(LoginResponse::NeedsSecondFactor(ticket));
            }
            (LoginState::AwaitingSecondFactor(_), Some(code)) => flow.submit_totp(code).await?,
            (state, _) => state,
        };

        self.finish(state, request.persist_token).await
    }

    /// Submits the TOTP code for a pending login.
    ///
    /// # Errors
    /// Returns error if the service could not be reached; the same ticket can be retried.
    pub async fn complete_second_factor(
        &self,
        ticket: LoginTicket,
        code: &str,
        persist_token: bool,
    ) -> Result<LoginResponse, AuthError> {
        let mut flow = LoginFlow::awaiting_second_factor(self.auth_port.clone(), ticket);
        let state = flow.submit_totp(code).await?;
        self.finish(state, persist_token).await
    }

    /// Deletes the stored token and drops it from the session.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.clear_credential();

        debug!("Deleting stored token");
        match self.storage_port.delete_token().await {
            Ok(()) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete stored token");
                Err(e)
            }
        }
    }

    async fn finish(
        &self,
        state: LoginState,
        persist_token: bool,
    ) -> Result<LoginResponse, AuthError> {
        match state {
            LoginState::Authenticated(token) => {
                let token_persisted = self.persist(&token, persist_token).await;
                self.session.set_credential(token.clone());
                Ok(LoginResponse::Authenticated {
                    token,
                    token_persisted,
                })
            }
            LoginState::Failed(failure) => Ok(LoginResponse::Failed(failure)),
            LoginState::AwaitingSecondFactor(ticket) => Ok(LoginResponse::NeedsSecondFactor(ticket)),
            other => Err(AuthError::InvalidLoginState {
                state: other.name(),
            }),
        }
    }

    async fn persist(&self, token: &AuthToken, enabled: bool) -> bool {
        if !enabled {
            debug!("Token persistence disabled, skipping storage");
            return false;
        }

        match self.storage_port.store_token(token).await {
            Ok(()) => {
                info!("Token persisted");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist token, session continues without it");
                false
            }
        }
    }
}
