//! Uniform request helper.
//!
//! Every call obtains a valid token from the [`SessionManager`] first, so an
//! expired access token is refreshed (once, however many requests are in
//! flight) before the request goes out.

use hrm_auth::{AuthError, SessionManager};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::attendance::Attendance;
use crate::employees::Employees;
use crate::error::{ApiError, Result};
use crate::leave::Leave;
use crate::notifications::Notifications;
use crate::organization::{Departments, Teams};
use crate::overtime::Overtime;

/// Page selection shared by the paginated list endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Paging {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self { page, page_size }
    }
}

/// HTTP client for the HRM API, authenticated through a [`SessionManager`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionManager,
}

impl ApiClient {
    /// Creates a client that talks to the API configured for `session`.
    pub fn new(session: SessionManager) -> Result<Self> {
        let config = session.config();
        let base_url = config
            .base_url()
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn employees(&self) -> Employees<'_> {
        Employees::new(self)
    }

    pub fn departments(&self) -> Departments<'_> {
        Departments::new(self)
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams::new(self)
    }

    pub fn attendance(&self) -> Attendance<'_> {
        Attendance::new(self)
    }

    pub fn leave(&self) -> Leave<'_> {
        Leave::new(self)
    }

    pub fn overtime(&self) -> Overtime<'_> {
        Overtime::new(self)
    }

    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(self)
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Builds a request carrying the current bearer token.
    ///
    /// Without a session the request is sent anonymously and the server
    /// decides; any other session failure aborts the request.
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let mut req = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        match self.session.get_valid_token().await {
            Ok(token) => req = req.bearer_auth(token),
            Err(AuthError::NoSession) => {
                tracing::debug!(path, "No session, sending request without credentials");
            }
            Err(e) => return Err(ApiError::Session(e)),
        }
        Ok(req)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.request(Method::GET, path).await?;
        send(req).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path).await?.query(query);
        send(req).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::POST, path).await?.json(body);
        send(req).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::PUT, path).await?.json(body);
        send(req).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.request(Method::DELETE, path).await?;
        send(req).await
    }
}

async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
    let resp = req
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    handle_response(resp).await
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        let message = error_message(status, &body);
        tracing::debug!(status = status.as_u16(), %message, "API request failed");
        return Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message },
            StatusCode::FORBIDDEN => ApiError::Forbidden { message },
            _ => ApiError::Http {
                status: status.as_u16(),
                message,
            },
        });
    }

    let body = if body.trim().is_empty() { "null" } else { &body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Message for a non-2xx response: the body's `message` when present.
pub fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
        Err(_) => "An error occurred".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_with_session, client_without_session};
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"Employee not found"}"#),
            "Employee not found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"x"}"#),
            "HTTP error! status: 400"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "An error occurred"
        );
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let server = MockServer::start().await;
        let (client, token) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/employees/e-1"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "e-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let value: Value = client.get("/api/employees/e-1").await.unwrap();
        assert_eq!(value["id"], "e-1");
    }

    #[tokio::test]
    async fn test_sends_anonymously_without_session() {
        let server = MockServer::start().await;
        let client = client_without_session(&server);
        Mock::given(method("GET"))
            .and(path("/api/employees/departments"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/employees/departments"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Login required" })))
            .mount(&server)
            .await;

        let err = client.get::<Value>("/api/employees/departments").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert!(err.requires_login());
        assert_eq!(err.to_string(), "Unauthorized: Login required");
    }

    #[tokio::test]
    async fn test_surfaces_server_message() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/attendance/check-in"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "message": "Already checked in" })),
            )
            .mount(&server)
            .await;

        let err = client
            .post::<Value, _>("/api/attendance/check-in", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "Already checked in");
    }

    #[tokio::test]
    async fn test_forbidden() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/employees/e-1"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client.delete::<Value>("/api/employees/e-1").await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden { .. }));
        assert!(!err.requires_login());
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/employees/teams/t-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let value: Value = client.delete("/api/employees/teams/t-1").await.unwrap();
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client.get::<Value>("/api/notifications").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_query_serialization() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Query {
            page_size: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            search: Option<String>,
        }

        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/employees"))
            .and(query_param("pageSize", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let _: Value = client
            .get_with_query(
                "/api/employees",
                &Query {
                    page_size: 25,
                    search: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let server = MockServer::start().await;
        let client = client_without_session(&server);
        drop(server);

        let err = client.get::<Value>("/api/employees").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_url_keeps_prefix() {
        let server_uri = "http://localhost:5000/hrm";
        let session = hrm_auth::SessionManager::new(
            hrm_auth::SessionConfig::new(server_uri).with_renewal_enabled(false),
            std::sync::Arc::new(hrm_auth::MemoryTokenStore::new()),
        )
        .unwrap();
        let client = ApiClient::new(session).unwrap();
        assert_eq!(
            client.url("/api/employees").unwrap().as_str(),
            "http://localhost:5000/hrm/api/employees"
        );
    }
}
