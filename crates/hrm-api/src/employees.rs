//! Employee directory endpoints.

use serde::Serialize;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::Result;

/// Filters for [`Employees::list`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

pub struct Employees<'a> {
    client: &'a ApiClient,
}

impl<'a> Employees<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &EmployeeQuery) -> Result<Value> {
        self.client.get_with_query("/api/employees", query).await
    }

    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.get(&format!("/api/employees/{id}")).await
    }

    pub async fn create(&self, employee: &Value) -> Result<Value> {
        self.client.post("/api/employees", employee).await
    }

    pub async fn update(&self, id: &str, employee: &Value) -> Result<Value> {
        self.client.put(&format!("/api/employees/{id}"), employee).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client.delete(&format!("/api/employees/{id}")).await
    }

    pub async fn team_members(&self, team_id: &str) -> Result<Value> {
        self.client.get(&format!("/api/employees/team/{team_id}")).await
    }

    /// Grants a realm role to an employee.
    pub async fn assign_role(&self, id: &str, role: &str) -> Result<Value> {
        self.client
            .post(
                &format!("/api/employees/{id}/assign-role"),
                &json!({ "role": role }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_with_session;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_sends_set_filters_only() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/employees"))
            .and(query_param("page", "2"))
            .and(query_param("departmentId", "d-1"))
            .and(query_param_is_missing("search"))
            .and(query_param_is_missing("teamId"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "items": [{ "id": "e-1" }], "totalCount": 1 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let query = EmployeeQuery {
            page: Some(2),
            department_id: Some("d-1".into()),
            ..Default::default()
        };
        let page = client.employees().list(&query).await.unwrap();
        assert_eq!(page["totalCount"], 1);
    }

    #[tokio::test]
    async fn test_assign_role() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/employees/e-7/assign-role"))
            .and(body_json(json!({ "role": "manager" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client.employees().assign_role("e-7", "manager").await.unwrap();
        assert_eq!(result["success"], true);
    }

    #[tokio::test]
    async fn test_team_members_path() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/employees/team/t-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "e-1" }])))
            .expect(1)
            .mount(&server)
            .await;

        let members = client.employees().team_members("t-3").await.unwrap();
        assert_eq!(members.as_array().map(Vec::len), Some(1));
    }
}
