//! Login handshake outcomes.
//!
//! The login endpoint answers a password submission with one of a few
//! loosely-typed shapes. They are classified here into [`LoginOutcome`] so
//! every caller handles the same closed set of cases.

use std::fmt;

use serde_json::Value;

use super::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::serde_utils::is_truthy;

/// Diagnostic for a login response that carries no error, no token and no
/// TOTP challenge. The API does not say which of the two causes applies.
pub const UNSUPPORTED_CHALLENGE_DIAGNOSTIC: &str = "Login failed. You probably entered your \
credentials wrong, or the account uses SMS two-factor authentication, which is not supported.";

/// Challenge identifier handed out when a TOTP code is required.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginTicket(String);

impl LoginTicket {
    /// Wraps a ticket value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the ticket value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LoginTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LoginTicket").field(&"***").finish()
    }
}

/// Terminal login failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    /// The login endpoint reported errors for the submitted credentials.
    Rejected,
    /// The TOTP endpoint refused the code.
    SecondFactorRejected,
    /// Neither token nor a supported challenge came back.
    UnsupportedChallenge,
}

impl LoginFailure {
    /// Returns a message suitable for showing to the user.
    #[must_use]
    pub const fn diagnostic(self) -> &'static str {
        match self {
            Self::Rejected => "Login failed. The email or password was rejected.",
            Self::SecondFactorRejected => "Login failed. The two-factor code was rejected.",
            Self::UnsupportedChallenge => UNSUPPORTED_CHALLENGE_DIAGNOSTIC,
        }
    }
}

impl fmt::Display for LoginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diagnostic())
    }
}

/// Result of one step of the login handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A session token was issued.
    Authenticated(AuthToken),
    /// A TOTP code must be submitted with this ticket.
    NeedsSecondFactor(LoginTicket),
    /// The handshake ended without a token.
    Failed(LoginFailure),
}

impl LoginOutcome {
    /// Classifies the body of a password login response.
    ///
    /// Checked in order: errors, token, TOTP challenge. An `errors` field
    /// wins over anything else in the body.
    #[must_use]
    pub fn from_login_response(body: &Value) -> Self {
        if body.get("errors").is_some_and(is_truthy) {
            return Self::Failed(LoginFailure::Rejected);
        }

        if let Some(token) = body
            .get("token")
            .and_then(Value::as_str)
            .and_then(AuthToken::new)
        {
            return Self::Authenticated(token);
        }

        if body.get("totp").is_some_and(is_truthy)
            && let Some(ticket) = body.get("ticket").and_then(Value::as_str)
        {
            return Self::NeedsSecondFactor(LoginTicket::new(ticket));
        }

        Self::Failed(LoginFailure::UnsupportedChallenge)
    }

    /// Parses and classifies a raw password login response body.
    ///
    /// # Errors
    /// Returns error if the body is not JSON.
    pub fn parse_login_response(body: &[u8]) -> Result<Self, AuthError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AuthError::unexpected(format!("malformed login response: {e}")))?;
        Ok(Self::from_login_response(&value))
    }

    /// Classifies a TOTP verification response.
    ///
    /// Any 4xx status is a rejected code; the body is not read in that case.
    ///
    /// # Errors
    /// Returns error if a non-4xx response carries no usable token.
    pub fn from_totp_response(status: u16, body: &[u8]) -> Result<Self, AuthError> {
        if (400..500).contains(&status) {
            return Ok(Self::Failed(LoginFailure::SecondFactorRejected));
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AuthError::unexpected(format!("malformed TOTP response: {e}")))?;

        value
            .get("token")
            .and_then(Value::as_str)
            .and_then(AuthToken::new)
            .map(Self::Authenticated)
            .ok_or_else(|| {
                AuthError::unexpected(format!("TOTP response (HTTP {status}) carried no token"))
            })
    }

    /// Returns the token if authenticated.
    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        match self {
            Self::Authenticated(token) => Some(token),
            _ => None,
        }
    }
}
