//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Token missing, stale or revoked (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials rejected by the login endpoint
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by server-side validation (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-2xx status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// A 401 on any call means the session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// The request never produced an HTTP status.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.status().is_none())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
