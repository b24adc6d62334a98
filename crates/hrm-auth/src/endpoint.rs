//! HTTP client for the `/api/auth` endpoints.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::token::TokenResponse;

const LOGIN_PATH: &str = "api/auth/login";
const REFRESH_PATH: &str = "api/auth/refresh";
const LOGOUT_PATH: &str = "api/auth/logout";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Performs login, refresh and logout calls against the HRM API.
#[derive(Debug, Clone)]
pub struct AuthEndpoint {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthEndpoint {
    pub fn new(config: &SessionConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::configuration(format!("Invalid endpoint path {path}: {e}")))
    }

    /// Exchanges credentials for a token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let resp = self
            .http
            .post(self.url(LOGIN_PATH)?)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(login_error(status, &body));
        }

        resp.json()
            .await
            .map_err(|e| AuthError::invalid_token(format!("Failed to parse token response: {e}")))
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// Every failure, transport included, is reported as `RefreshFailed`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let resp = self
            .http
            .post(self.url(REFRESH_PATH)?)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| AuthError::refresh_failed(format!("Network error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = server_message(&body)
                .unwrap_or_else(|| format!("Refresh rejected (HTTP {status})"));
            return Err(AuthError::refresh_failed(message));
        }

        resp.json()
            .await
            .map_err(|e| AuthError::refresh_failed(format!("Failed to parse token response: {e}")))
    }

    /// Asks the server to invalidate the refresh token.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let resp = self
            .http
            .post(self.url(LOGOUT_PATH)?)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::network(format!(
                "Logout failed (HTTP {status}): {}",
                server_message(&body).unwrap_or(body)
            )));
        }
        Ok(())
    }
}

fn login_error(status: StatusCode, body: &str) -> AuthError {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => AuthError::invalid_credentials(
            message_field(&json).unwrap_or_else(|| "Invalid username or password".to_string()),
        ),
        Err(_) => {
            tracing::debug!(%status, "Login rejected with a non-JSON body");
            AuthError::invalid_credentials("Login failed")
        }
    }
}

fn message_field(json: &Value) -> Option<String> {
    json.get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Extracts the `message` field of a JSON error body.
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(message_field)
}
