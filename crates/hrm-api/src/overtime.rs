//! Overtime requests and approvals.

use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, Paging};
use crate::dates::{format_date, format_time, parse_date, parse_time};
use crate::error::{ApiError, Result};
use crate::leave::{ApproveBody, RejectBody, RequestStatus, reject_reason};

/// Body of `POST /api/overtime/request`.
///
/// Built through [`NewOvertimeRequest::new`], which normalizes the date and
/// times and computes `total_minutes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOvertimeRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NewOvertimeRequest {
    /// Validates a `YYYY-MM-DD` date and `HH:MM` start and end times.
    pub fn new(date: &str, start_time: &str, end_time: &str) -> Result<Self> {
        let date = parse_date(date, "Date")?;
        let start = parse_time(start_time, "Start time")?;
        let end = parse_time(end_time, "End time")?;

        let total_minutes = (end - start).whole_minutes();
        if total_minutes <= 0 {
            return Err(ApiError::validation("End time must be after start time"));
        }

        Ok(Self {
            date: format_date(date),
            start_time: format_time(start),
            end_time: format_time(end),
            total_minutes,
            reason: None,
        })
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Renders a minute count as `"Xh Ym"`.
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Filters for [`Overtime::requests`]. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub paging: Paging,
}

pub struct Overtime<'a> {
    client: &'a ApiClient,
}

impl<'a> Overtime<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_request(&self, request: &NewOvertimeRequest) -> Result<Value> {
        if request.total_minutes <= 0 {
            return Err(ApiError::validation("End time must be after start time"));
        }
        tracing::debug!(
            date = %request.date,
            total_minutes = request.total_minutes,
            "Submitting overtime request"
        );
        self.client.post("/api/overtime/request", request).await
    }

    pub async fn requests(&self, query: &OvertimeQuery) -> Result<Value> {
        self.client
            .get_with_query("/api/overtime/requests", query)
            .await
    }

    pub async fn pending_requests(&self, paging: Paging) -> Result<Value> {
        self.client
            .get_with_query("/api/overtime/requests/pending", &paging)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.get(&format!("/api/overtime/request/{id}")).await
    }

    pub async fn approve(&self, id: &str, comment: Option<&str>) -> Result<Value> {
        self.client
            .post(
                &format!("/api/overtime/request/{id}/approve"),
                &ApproveBody { comment },
            )
            .await
    }

    pub async fn reject(&self, id: &str, reason: &str) -> Result<Value> {
        let reason = reject_reason(reason)?;
        self.client
            .post(
                &format!("/api/overtime/request/{id}/reject"),
                &RejectBody { reason },
            )
            .await
    }
}
