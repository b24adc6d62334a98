//! Token types and claim decoding.
//!
//! - [`claims`] - Unverified decoding of access token claims and expiry checks
//! - [`TokenPair`] - The access/refresh pair persisted between runs
//! - [`TokenResponse`] - Wire shape returned by the login and refresh endpoints

pub mod claims;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use claims::{
    RealmAccess, TokenClaims, decode_claims, expires_within, expires_within_at, is_token_expired,
    is_token_expired_at,
};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "hrm_access_token";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "hrm_refresh_token";

/// The access/refresh token pair of an authenticated session.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenPair {
    #[serde(rename = "hrm_access_token")]
    pub access_token: String,
    #[serde(rename = "hrm_refresh_token")]
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// A pair is usable only when both tokens are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Response body of `POST /api/auth/login` and `POST /api/auth/refresh`.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}
