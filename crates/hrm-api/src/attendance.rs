//! Attendance endpoints: check-in/out, status, history, shifts and the
//! team view used by managers.

use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;

/// Optional details sent with a check-in or check-out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckInOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Filters for [`Attendance::history`]. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusQuery<'q> {
    #[serde(skip_serializing_if = "Option::is_none")]
    employee_id: Option<&'q str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'q str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShiftQuery<'q> {
    #[serde(skip_serializing_if = "Option::is_none")]
    department_id: Option<&'q str>,
}

#[derive(Serialize)]
struct DateQuery<'q> {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'q str>,
}

pub struct Attendance<'a> {
    client: &'a ApiClient,
}

impl<'a> Attendance<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn check_in(&self, details: &CheckInOut) -> Result<Value> {
        self.client.post("/api/attendance/check-in", details).await
    }

    pub async fn check_out(&self, details: &CheckInOut) -> Result<Value> {
        self.client.post("/api/attendance/check-out", details).await
    }

    /// Attendance status for an employee on a date; both default to the
    /// caller and today on the server.
    pub async fn status(&self, employee_id: Option<&str>, date: Option<&str>) -> Result<Value> {
        self.client
            .get_with_query("/api/attendance/status", &StatusQuery { employee_id, date })
            .await
    }

    pub async fn history(&self, query: &HistoryQuery) -> Result<Value> {
        self.client
            .get_with_query("/api/attendance/history", query)
            .await
    }

    pub async fn shifts(&self, department_id: Option<&str>) -> Result<Value> {
        self.client
            .get_with_query("/api/attendance/shifts", &ShiftQuery { department_id })
            .await
    }

    pub async fn team(&self, team_id: &str, date: Option<&str>) -> Result<Value> {
        self.client
            .get_with_query(
                &format!("/api/attendance/team/{team_id}"),
                &DateQuery { date },
            )
            .await
    }
}
