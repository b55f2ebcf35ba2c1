//! `reqwest`-backed HTTP transport.

use async_trait::async_trait;
use reqwest::{Client, Method, header};
use tracing::{trace, warn};

use crate::domain::errors::ApiError;
use crate::domain::ports::{HttpMethod, HttpPort, HttpRequest, HttpResponse};

/// HTTP transport over a shared `reqwest` client.
///
/// Uses the client's default timeouts and connection pool. The User-Agent and
/// authorization come from the request headers, never from the client.
#[derive(Debug, Clone)]
pub struct ReqwestHttp {
    client: Client,
}

impl ReqwestHttp {
    /// Creates the transport.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn map_send_error(error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::network("request timed out")
        } else if error.is_connect() {
            ApiError::network(format!("failed to connect: {error}"))
        } else {
            ApiError::network(error.to_string())
        }
    }
}

#[async_trait]
impl HttpPort for ReqwestHttp {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match (&request.json, request.method) {
            (Some(body), _) => builder.json(body),
            (None, HttpMethod::Post) => builder.header(header::CONTENT_LENGTH, "0"),
            (None, HttpMethod::Get) => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, url = %request.url, "HTTP request failed");
            Self::map_send_error(&e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, url = %request.url, "Failed to read response body");
            Self::map_send_error(&e)
        })?;

        trace!(status, bytes = body.len(), url = %request.url, "HTTP response received");

        Ok(HttpResponse::new(status, body))
    }
}
