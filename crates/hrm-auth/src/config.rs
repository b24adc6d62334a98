//! Session configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! api_url = "https://hrm.example.com"
//! request_timeout = "10s"
//! renewal_interval = "30s"
//! min_validity = "1m"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Upper bound for `renewal_interval` and `min_validity`.
pub const MAX_RENEWAL_SETTING: Duration = Duration::from_secs(24 * 60 * 60);

/// Settings for the session manager and its auth endpoint client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the HRM API. Auth endpoints live under `/api/auth`.
    pub api_url: String,

    /// Timeout applied to every auth request.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Run the background renewal task while a session is active.
    pub renewal_enabled: bool,

    /// How often the renewal task checks the access token.
    /// Must be shorter than the typical access token lifetime.
    #[serde(with = "humantime_serde")]
    pub renewal_interval: Duration,

    /// Renew the access token once it expires within this window.
    #[serde(with = "humantime_serde")]
    pub min_validity: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            renewal_enabled: true,
            renewal_interval: Duration::from_secs(30),
            min_validity: Duration::from_secs(60),
        }
    }
}

impl SessionConfig {
    /// Creates a configuration for the given API base URL with default values.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enables or disables background renewal.
    #[must_use]
    pub fn with_renewal_enabled(mut self, enabled: bool) -> Self {
        self.renewal_enabled = enabled;
        self
    }

    /// Sets the renewal tick interval.
    #[must_use]
    pub fn with_renewal_interval(mut self, interval: Duration) -> Self {
        self.renewal_interval = interval;
        self
    }

    /// Sets the minimum remaining validity before a proactive renewal.
    #[must_use]
    pub fn with_min_validity(mut self, min_validity: Duration) -> Self {
        self.min_validity = min_validity;
        self
    }

    /// Parses the API URL, normalized to end with a slash so relative joins
    /// keep any path prefix.
    pub fn base_url(&self) -> Result<Url, AuthError> {
        let mut raw = self.api_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)
            .map_err(|e| AuthError::configuration(format!("invalid api_url '{}': {e}", self.api_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AuthError::configuration(format!(
                "unsupported api_url scheme '{other}'"
            ))),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AuthError> {
        self.base_url()?;
        if self.request_timeout.is_zero() {
            return Err(AuthError::configuration("request_timeout must be greater than zero"));
        }
        if self.renewal_enabled && self.renewal_interval.is_zero() {
            return Err(AuthError::configuration("renewal_interval must be greater than zero"));
        }
        if self.renewal_interval > MAX_RENEWAL_SETTING {
            return Err(AuthError::configuration(format!(
                "renewal_interval must not exceed {}s",
                MAX_RENEWAL_SETTING.as_secs()
            )));
        }
        if self.min_validity > MAX_RENEWAL_SETTING {
            return Err(AuthError::configuration(format!(
                "min_validity must not exceed {}s",
                MAX_RENEWAL_SETTING.as_secs()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.renewal_enabled);
        assert_eq!(config.renewal_interval, Duration::from_secs(30));
        assert_eq!(config.min_validity, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new("https://hrm.example.com")
            .with_request_timeout(Duration::from_secs(3))
            .with_renewal_enabled(false)
            .with_renewal_interval(Duration::from_secs(5))
            .with_min_validity(Duration::from_secs(15));

        assert_eq!(config.api_url, "https://hrm.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(!config.renewal_enabled);
        assert_eq!(config.renewal_interval, Duration::from_secs(5));
        assert_eq!(config.min_validity, Duration::from_secs(15));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = SessionConfig::new("https://hrm.example.com/tenant");
        let url = config.base_url().unwrap();
        assert_eq!(url.as_str(), "https://hrm.example.com/tenant/");
        assert_eq!(
            url.join("api/auth/login").unwrap().as_str(),
            "https://hrm.example.com/tenant/api/auth/login"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SessionConfig::new("not a url").validate().is_err());
        assert!(SessionConfig::new("ftp://hrm.example.com").validate().is_err());
        assert!(
            SessionConfig::default()
                .with_request_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(
            SessionConfig::default()
                .with_renewal_interval(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(
            SessionConfig::default()
                .with_renewal_enabled(false)
                .with_renewal_interval(Duration::ZERO)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_validate_bounds_renewal_settings() {
        let centuries = Duration::from_secs(400 * 365 * 24 * 3600 * 30);
        let err = SessionConfig::default()
            .with_min_validity(centuries)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("min_validity must not exceed 86400s"));
        assert!(
            SessionConfig::default()
                .with_renewal_interval(Duration::MAX)
                .validate()
                .is_err()
        );
        assert!(
            SessionConfig::default()
                .with_renewal_interval(MAX_RENEWAL_SETTING)
                .with_min_validity(MAX_RENEWAL_SETTING)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_deserialize_humantime() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"api_url":"https://hrm.example.com","renewal_interval":"45s","min_validity":"2m"}"#,
        )
        .unwrap();
        assert_eq!(config.renewal_interval, Duration::from_secs(45));
        assert_eq!(config.min_validity, Duration::from_secs(120));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
