//! Department and team endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DepartmentFilter<'q> {
    #[serde(skip_serializing_if = "Option::is_none")]
    department_id: Option<&'q str>,
}

pub struct Departments<'a> {
    client: &'a ApiClient,
}

impl<'a> Departments<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value> {
        self.client.get("/api/employees/departments").await
    }

    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client
            .get(&format!("/api/employees/departments/{id}"))
            .await
    }

    pub async fn teams(&self, department_id: &str) -> Result<Value> {
        self.client
            .get(&format!("/api/employees/departments/{department_id}/teams"))
            .await
    }
}

pub struct Teams<'a> {
    client: &'a ApiClient,
}

impl<'a> Teams<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists teams, optionally restricted to one department.
    pub async fn list(&self, department_id: Option<&str>) -> Result<Value> {
        self.client
            .get_with_query("/api/employees/teams", &DepartmentFilter { department_id })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.get(&format!("/api/employees/teams/{id}")).await
    }

    pub async fn members(&self, id: &str) -> Result<Value> {
        self.client.get(&format!("/api/employees/team/{id}")).await
    }

    pub async fn create(&self, team: &Value) -> Result<Value> {
        self.client.post("/api/employees/teams", team).await
    }

    pub async fn update(&self, id: &str, team: &Value) -> Result<Value> {
        self.client
            .put(&format!("/api/employees/teams/{id}"), team)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .delete(&format!("/api/employees/teams/{id}"))
            .await
    }
}
