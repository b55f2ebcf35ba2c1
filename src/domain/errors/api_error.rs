//! REST API error types.

use thiserror::Error;

/// Errors from talking to the REST API.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, reset).
    #[error("network error: {message}")]
    Network { message: String },

    /// The API answered with a status the operation does not accept.
    #[error("Discord API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns whether the API rejected the session credential.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}
