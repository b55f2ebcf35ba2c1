//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{LoginOutcome, LoginTicket};
use crate::domain::errors::AuthError;

/// Port for the two login endpoints.
///
/// Implementations send one request per call and classify the answer; they
/// never touch stored or in-memory session state.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Submits email and password.
    async fn submit_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError>;

    /// Submits a TOTP code for a pending challenge.
    async fn submit_totp(
        &self,
        ticket: &LoginTicket,
        code: &str,
    ) -> Result<LoginOutcome, AuthError>;
}
