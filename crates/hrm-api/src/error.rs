//! API client error types.

use hrm_auth::AuthError;

/// Errors returned by [`crate::ApiClient`] and the endpoint groups.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Obtaining a valid bearer token failed.
    #[error(transparent)]
    Session(#[from] AuthError),

    /// The API could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The server rejected the bearer token (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The server refused the operation for this user (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Any other non-2xx response.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body could not be parsed.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status of the failed response, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the user has to log in again.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        match self {
            Self::Session(e) => e.requires_login(),
            Self::Unauthorized { .. } => true,
            _ => false,
        }
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
