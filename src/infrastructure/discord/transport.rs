//! Request construction against the REST API.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::errors::ApiError;
use crate::domain::ports::{HttpMethod, HttpPort, HttpRequest, HttpResponse};
use crate::domain::session::SessionState;

/// Issues one API request per call with the session's current headers.
///
/// Each call takes a single [`RequestContext`](crate::domain::RequestContext)
/// snapshot, so a request never mixes headers from two credentials.
#[derive(Clone)]
pub struct ApiTransport {
    http: Arc<dyn HttpPort>,
    session: Arc<SessionState>,
}

impl ApiTransport {
    /// Creates a transport bound to a session.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, session: Arc<SessionState>) -> Self {
        Self { http, session }
    }

    /// Session this transport authenticates with.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Sends an authenticated request to an API path.
    ///
    /// Non-2xx responses are returned as values.
    ///
    /// # Errors
    /// Returns error if no response was received.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let context = self.session.current();
        if !context.is_authenticated() {
            debug!(path, "Sending request without a session credential");
        }

        let request = Self::build(method, context.url(path), context.headers(), body);
        self.dispatch(request, path).await
    }

    /// Sends a request to an API path with only the User-Agent.
    ///
    /// # Errors
    /// Returns error if no response was received.
    pub async fn request_anonymous(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let context = self.session.current();
        let request = Self::build(method, context.url(path), context.anonymous_headers(), body);
        self.dispatch(request, path).await
    }

    fn build(
        method: HttpMethod,
        url: String,
        headers: Vec<(String, String)>,
        body: Option<Value>,
    ) -> HttpRequest {
        let request = HttpRequest::new(method, url).with_headers(headers);
        match body {
            Some(body) => request.with_json(body),
            None => request,
        }
    }

    async fn dispatch(&self, request: HttpRequest, path: &str) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        debug!(%method, path, "Sending API request");

        let response = self.http.send(request).await.map_err(|e| {
            warn!(%method, path, error = %e, "API request failed");
            e
        })?;

        debug!(%method, path, status = response.status, "API response received");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AuthToken;
    use crate::domain::ports::mocks::MockHttpPort;
    use crate::domain::ports::{AUTHORIZATION_HEADER, USER_AGENT_HEADER};
    use crate::domain::session::DEFAULT_USER_AGENT;
    use serde_json::json;

    fn session_with_token(token: &str) -> Arc<SessionState> {
        let session = Arc::new(SessionState::new("https://api.test/v9", DEFAULT_USER_AGENT));
        session.set_credential(AuthToken::new_unchecked(token));
        session
    }

    #[tokio::test]
    async fn test_request_attaches_user_agent_and_token() {
        let mut http = MockHttpPort::new();
        http.expect_send()
            .withf(|req: &HttpRequest| {
                req.url == "https://api.test/v9/users/@me/guilds"
                    && req.method == HttpMethod::Get
                    && req.header(AUTHORIZATION_HEADER) == Some("tok")
                    && req.header(USER_AGENT_HEADER) == Some(DEFAULT_USER_AGENT)
                    && req.json.is_none()
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "[]")));

        let transport = ApiTransport::new(Arc::new(http), session_with_token("tok"));
        let response = transport
            .request(HttpMethod::Get, "users/@me/guilds", None)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_token() {
        let mut http = MockHttpPort::new();
        http.expect_send()
            .withf(|req: &HttpRequest| {
                req.header(AUTHORIZATION_HEADER).is_none()
                    && req.header(USER_AGENT_HEADER).is_some()
                    && req.json == Some(json!({"a": 1}))
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));

        let transport = ApiTransport::new(Arc::new(http), session_with_token("tok"));
        transport
            .request_anonymous(HttpMethod::Post, "auth/login", Some(json!({"a": 1})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_latest_credential_used_after_update() {
        let mut http = MockHttpPort::new();
        http.expect_send()
            .withf(|req: &HttpRequest| req.header(AUTHORIZATION_HEADER) == Some("new"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(204, "")));

        let session = session_with_token("old");
        let transport = ApiTransport::new(Arc::new(http), Arc::clone(&session));
        session.set_credential(AuthToken::new_unchecked("new"));

        transport
            .request(HttpMethod::Post, "channels/1/typing", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_value() {
        let mut http = MockHttpPort::new();
        http.expect_send()
            .returning(|_| Ok(HttpResponse::new(401, r#"{"message":"401: Unauthorized"}"#)));

        let transport = ApiTransport::new(Arc::new(http), Arc::new(SessionState::with_defaults()));
        let response = transport
            .request(HttpMethod::Get, "users/@me/relationships", None)
            .await
            .unwrap();

        assert_eq!(response.status, 401);
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let mut http = MockHttpPort::new();
        http.expect_send()
            .times(1)
            .returning(|_| Err(ApiError::network("connection reset")));

        let transport = ApiTransport::new(Arc::new(http), Arc::new(SessionState::with_defaults()));
        let result = transport
            .request(HttpMethod::Get, "users/@me/guilds", None)
            .await;

        assert!(matches!(result, Err(ApiError::Network { .. })));
    }
}
