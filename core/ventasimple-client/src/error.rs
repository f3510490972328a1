//! Client error types.

use crate::gateway::Payload;
use thiserror::Error;

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// A non-2xx response.
#[derive(Debug, Clone, Error)]
#[error("{message} (HTTP {status})")]
pub struct RequestError {
    /// The body's `error` field, the status reason phrase, or `Request error`.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Decoded response body.
    pub body: Payload,
}

/// Errors returned by every backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached or the body could not be read.
    #[error("could not reach the server")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A body did not match the expected record.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client could not be built or a header was invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status for request errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request(err) => Some(err.status),
            _ => None,
        }
    }

    /// Text suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request(err) => err.message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns true for 401/403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
