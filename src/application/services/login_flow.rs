//! Email/password login as an explicit state machine.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{AuthToken, LoginFailure, LoginOutcome, LoginTicket};
use crate::domain::errors::AuthError;
use crate::domain::ports::AuthPort;

/// Where a login attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Credentials are in flight.
    AwaitingPrimaryResult,
    /// The account asked for a TOTP code.
    AwaitingSecondFactor(LoginTicket),
    /// A session token was obtained.
    Authenticated(AuthToken),
    /// The service refused the attempt.
    Failed(LoginFailure),
}

impl LoginState {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingPrimaryResult => "awaiting primary result",
            Self::AwaitingSecondFactor(_) => "awaiting second factor",
            Self::Authenticated(_) => "authenticated",
            Self::Failed(_) => "failed",
        }
    }

    /// Returns true for `Authenticated` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Failed(_))
    }
}

/// Drives one login attempt against an [`AuthPort`].
///
/// The flow only tracks its own state; storing the token and updating the
/// session is left to the caller.
pub struct LoginFlow {
    auth: Arc<dyn AuthPort>,
    state: LoginState,
}

impl LoginFlow {
    /// Starts a flow in `Idle`.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthPort>) -> Self {
        Self {
            auth,
            state: LoginState::Idle,
        }
    }

    /// Resumes a flow that is waiting for a TOTP code.
    #[must_use]
    pub fn awaiting_second_factor(auth: Arc<dyn AuthPort>, ticket: LoginTicket) -> Self {
        Self {
            auth,
            state: LoginState::AwaitingSecondFactor(ticket),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &LoginState {
        &self.state
    }

    /// Returns to `Idle`, dropping any ticket.
    pub fn reset(&mut self) {
        self.state = LoginState::Idle;
    }

    /// Submits email and password.
    ///
    /// Allowed from `Idle` and `Failed`. A transport failure puts the flow
    /// back in `Idle`.
    ///
    /// # Errors
    /// Returns `InvalidLoginState` from any other state, or the port's error.
    pub async fn submit_credentials(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<LoginState, AuthError> {
        if !matches!(self.state, LoginState::Idle | LoginState::Failed(_)) {
            return Err(AuthError::InvalidLoginState {
                state: self.state.name(),
            });
        }

        self.state = LoginState::AwaitingPrimaryResult;
        debug!("Credentials submitted");

        match self.auth.submit_credentials(email, password).await {
            Ok(outcome) => {
                self.state = Self::next_state(outcome);
                self.log_transition();
                Ok(self.state.clone())
            }
            Err(e) => {
                warn!(error = %e, "Login request failed");
                self.state = LoginState::Idle;
                Err(e)
            }
        }
    }

    /// Submits a TOTP code for the pending ticket.
    ///
    /// On a transport failure the ticket is kept so the code can be sent again.
    ///
    /// # Errors
    /// Returns `InvalidLoginState` unless awaiting a second factor, or the port's error.
    pub async fn submit_totp(&mut self, code: &str) -> Result<LoginState, AuthError> {
        let LoginState::AwaitingSecondFactor(ticket) = &self.state else {
            return Err(AuthError::InvalidLoginState {
                state: self.state.name(),
            });
        };

        let outcome = self.auth.submit_totp(ticket, code.trim()).await.map_err(|e| {
            warn!(error = %e, "TOTP request failed, code can be resubmitted");
            e
        })?;

        if let LoginOutcome::NeedsSecondFactor(_) = outcome {
            return Err(AuthError::unexpected("second factor requested twice"));
        }

        self.state = Self::next_state(outcome);
        self.log_transition();
        Ok(self.state.clone())
    }

    fn next_state(outcome: LoginOutcome) -> LoginState {
        match outcome {
            LoginOutcome::Authenticated(token) => LoginState::Authenticated(token),
            LoginOutcome::NeedsSecondFactor(ticket) => LoginState::AwaitingSecondFactor(ticket),
            LoginOutcome::Failed(failure) => LoginState::Failed(failure),
        }
    }

    fn log_transition(&self) {
        match &self.state {
            LoginState::Authenticated(token) => info!(token = %token, "Login succeeded"),
            LoginState::Failed(failure) => {
                warn!(reason = %failure, diagnostic = failure.diagnostic(), "Login failed");
            }
            state => info!(state = state.name(), "Login in progress"),
        }
    }
}
