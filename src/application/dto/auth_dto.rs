//! Authentication DTOs.

use crate::domain::entities::{AuthToken, LoginFailure, LoginTicket};

/// Source of the authentication token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Token read from the token file.
    StoredFile,
    /// Token given on the command line or environment.
    CommandLine,
    /// Token obtained by an email/password login.
    Login,
}

impl TokenSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::StoredFile => "stored token file",
            Self::CommandLine => "command line / environment",
            Self::Login => "password login",
        }
    }
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login request data.
#[derive(Clone)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// TOTP code to submit right away if the account asks for one.
    pub totp_code: Option<String>,
    /// Whether to persist token.
    pub persist_token: bool,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            totp_code: None,
            persist_token: true,
        }
    }

    /// Supplies the TOTP code up front.
    #[must_use]
    pub fn with_totp(mut self, code: impl Into<String>) -> Self {
        self.totp_code = Some(code.into());
        self
    }

    /// Disables token persistence.
    #[must_use]
    pub const fn without_persistence(mut self) -> Self {
        self.persist_token = false;
        self
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("totp_code", &self.totp_code.as_ref().map(|_| "<redacted>"))
            .field("persist_token", &self.persist_token)
            .finish()
    }
}

/// Login response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResponse {
    /// Logged in; the session now carries the token.
    Authenticated {
        /// The new session token.
        token: AuthToken,
        /// Whether token was persisted.
        token_persisted: bool,
    },
    /// The account needs a TOTP code for this ticket.
    NeedsSecondFactor(LoginTicket),
    /// The service refused the attempt.
    Failed(LoginFailure),
}

impl LoginResponse {
    /// Returns true once a token was obtained.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}
