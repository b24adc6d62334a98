//! In-app notifications.

use serde::Serialize;
use serde_json::{Value, json};

use crate::client::{ApiClient, Paging};
use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    /// Only sent when set.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unread_only: bool,
    #[serde(flatten)]
    pub paging: Paging,
}

pub struct Notifications<'a> {
    client: &'a ApiClient,
}

impl<'a> Notifications<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &NotificationQuery) -> Result<Value> {
        self.client.get_with_query("/api/notifications", query).await
    }

    pub async fn mark_read(&self, id: &str) -> Result<Value> {
        self.client
            .post(&format!("/api/notifications/{id}/read"), &json!({}))
            .await
    }

    pub async fn mark_all_read(&self) -> Result<Value> {
        self.client
            .post("/api/notifications/read-all", &json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_with_session;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_unread_only_flag() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .and(query_param("unreadOnly", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [1] })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .and(query_param_is_missing("unreadOnly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let unread = client
            .notifications()
            .list(&NotificationQuery {
                unread_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(unread["items"], json!([1]));

        client
            .notifications()
            .list(&NotificationQuery::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mark_read() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/notifications/n-1/read"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/notifications/read-all"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.notifications().mark_read("n-1").await.unwrap().is_null());
        client.notifications().mark_all_read().await.unwrap();
    }
}
