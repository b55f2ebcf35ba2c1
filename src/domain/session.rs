//! Process-wide session state.
//!
//! [`SessionState`] owns the current token and the headers derived from it.
//! Readers take an immutable [`RequestContext`] snapshot per request; the
//! single writer replaces the whole snapshot, so a request either sees the old
//! credential or the new one, never a mix.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::domain::entities::AuthToken;
use crate::domain::ports::{AUTHORIZATION_HEADER, USER_AGENT_HEADER};

/// REST API origin including the version path.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v9";

/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Immutable request settings derived from the current credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    origin: String,
    user_agent: String,
    credential: Option<AuthToken>,
}

impl RequestContext {
    /// Creates a context.
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        user_agent: impl Into<String>,
        credential: Option<AuthToken>,
    ) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            credential,
        }
    }

    /// API origin without trailing slash.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// User-Agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Current credential, if any.
    #[must_use]
    pub const fn credential(&self) -> Option<&AuthToken> {
        self.credential.as_ref()
    }

    /// Returns whether requests will carry an authorization header.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Absolute URL for an API path such as `users/@me/guilds`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.origin, path.trim_start_matches('/'))
    }

    /// Headers for authenticated requests.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = self.anonymous_headers();
        if let Some(token) = &self.credential {
            headers.push((AUTHORIZATION_HEADER.to_string(), token.as_str().to_string()));
        }
        headers
    }

    /// Headers for requests that must not carry the token.
    #[must_use]
    pub fn anonymous_headers(&self) -> Vec<(String, String)> {
        vec![(USER_AGENT_HEADER.to_string(), self.user_agent.clone())]
    }

    fn with_credential(&self, credential: Option<AuthToken>) -> Self {
        Self {
            origin: self.origin.clone(),
            user_agent: self.user_agent.clone(),
            credential,
        }
    }
}

/// Shared, single-writer holder of the current [`RequestContext`].
#[derive(Debug)]
pub struct SessionState {
    context: RwLock<Arc<RequestContext>>,
}

impl SessionState {
    /// Creates an unauthenticated session.
    #[must_use]
    pub fn new(origin: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            context: RwLock::new(Arc::new(RequestContext::new(origin, user_agent, None))),
        }
    }

    /// Creates an unauthenticated session against the public API.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_USER_AGENT)
    }

    /// Replaces the credential and re-derives the headers.
    pub fn set_credential(&self, token: AuthToken) {
        let masked = token.masked();
        {
            let mut guard = self.context.write();
            let next = guard.with_credential(Some(token));
            *guard = Arc::new(next);
        }
        info!(token = %masked, "Session credential updated");
    }

    /// Drops the credential; later requests go out unauthenticated.
    pub fn clear_credential(&self) {
        {
            let mut guard = self.context.write();
            let next = guard.with_credential(None);
            *guard = Arc::new(next);
        }
        debug!("Session credential cleared");
    }

    /// Returns the current context snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<RequestContext> {
        Arc::clone(&self.context.read())
    }

    /// Returns the headers of the current snapshot.
    #[must_use]
    pub fn current_headers(&self) -> Vec<(String, String)> {
        self.current().headers()
    }

    /// Returns the current credential.
    #[must_use]
    pub fn credential(&self) -> Option<AuthToken> {
        self.current().credential().cloned()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::with_defaults()
    }
}
