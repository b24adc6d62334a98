//! Access token claim decoding.
//!
//! The client never verifies token signatures: claims are read for display
//! and scheduling purposes only, and the API server remains the sole
//! authority on whether a token is acceptable.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AuthError;

/// Realm-level role assignments embedded in the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Claims carried in the access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenClaims {
    /// Subject (user id).
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub preferred_username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub given_name: Option<String>,

    #[serde(default)]
    pub family_name: Option<String>,

    #[serde(default)]
    pub realm_access: Option<RealmAccess>,

    /// Expiration time (seconds since the Unix epoch).
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Realm roles, empty when the claim is absent.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.realm_access
            .as_ref()
            .map(|r| r.roles.as_slice())
            .unwrap_or_default()
    }

    /// Expiry instant, `None` when `exp` is missing or outside the
    /// representable range.
    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.exp?).ok()
    }
}

/// Decodes the payload segment of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::invalid_token("expected three dot-separated segments"));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::invalid_token(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::invalid_token(format!("payload is not valid claims JSON: {e}")))
}

/// Returns `true` if the token's expiry is strictly before `now`.
///
/// Any token that cannot be decoded, or carries no `exp`, counts as expired.
#[must_use]
pub fn is_token_expired_at(token: &str, now: OffsetDateTime) -> bool {
    match decode_claims(token).ok().and_then(|c| c.expires_at()) {
        Some(expires_at) => expires_at < now,
        None => true,
    }
}

/// Returns `true` if the token has expired at the current time.
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, OffsetDateTime::now_utc())
}

/// Returns `true` if the token expires within `window` from `now`.
///
/// Malformed tokens always count as expiring, as does any window reaching
/// past the representable date range.
#[must_use]
pub fn expires_within_at(token: &str, window: Duration, now: OffsetDateTime) -> bool {
    let Some(expires_at) = decode_claims(token).ok().and_then(|c| c.expires_at()) else {
        return true;
    };
    match time::Duration::try_from(window)
        .ok()
        .and_then(|window| now.checked_add(window))
    {
        Some(deadline) => expires_at <= deadline,
        None => true,
    }
}

/// Returns `true` if the token expires within `window` from now.
#[must_use]
pub fn expires_within(token: &str, window: Duration) -> bool {
    expires_within_at(token, window, OffsetDateTime::now_utc())
}
