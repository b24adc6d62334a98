//! Session error types.
//!
//! This module defines every error the session manager can surface to its
//! callers, together with a coarse category used for logging.

use std::fmt;

/// Errors that can occur while establishing, renewing or ending a session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The login endpoint rejected the supplied credentials.
    ///
    /// The message is the server-provided text (or a generic fallback) and
    /// is meant to be shown to the user as is.
    #[error("{message}")]
    InvalidCredentials {
        /// Human-readable reason the login was rejected.
        message: String,
    },

    /// The auth endpoint could not be reached or timed out.
    #[error("Network error: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// The access token is missing, malformed, or its claims cannot be decoded.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// Exchanging the refresh token failed. The session has been cleared.
    #[error("Refresh failed: {message}")]
    RefreshFailed {
        /// Description of the refresh failure.
        message: String,
    },

    /// There is no stored token pair.
    #[error("No active session")]
    NoSession,

    /// The token store could not be read or written.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The session configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidCredentials` error.
    #[must_use]
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: message.into(),
        }
    }

    /// Creates a new `Network` error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `RefreshFailed` error.
    #[must_use]
    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if the error means the user has to log in again.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NoSession | Self::RefreshFailed { .. })
    }

    /// Returns `true` if this is a token-related error.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::InvalidToken { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCredentials { .. } => ErrorCategory::Authentication,
            Self::Network { .. } => ErrorCategory::Transport,
            Self::InvalidToken { .. } => ErrorCategory::Token,
            Self::RefreshFailed { .. } => ErrorCategory::Session,
            Self::NoSession => ErrorCategory::Session,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

/// Categories of session errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential checks at login.
    Authentication,
    /// Connectivity with the auth endpoints.
    Transport,
    /// Token decoding and expiry.
    Token,
    /// Session lifecycle (missing or terminated sessions).
    Session,
    /// Token store failures.
    Infrastructure,
    /// Invalid settings.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Transport => write!(f, "transport"),
            Self::Token => write!(f, "token"),
            Self::Session => write!(f, "session"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}
