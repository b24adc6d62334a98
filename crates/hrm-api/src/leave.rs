//! Leave requests, approvals and balances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiClient, Paging};
use crate::dates::parse_date;
use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    #[default]
    Annual,
    Sick,
    Unpaid,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Sick => "sick",
            Self::Unpaid => "unpaid",
        }
    }

    /// Human readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Annual => "Annual Leave",
            Self::Sick => "Sick Leave",
            Self::Unpaid => "Unpaid Leave",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "annual" => Ok(Self::Annual),
            "sick" => Ok(Self::Sick),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(format!(
                "unknown leave type '{other}' (expected annual, sick or unpaid)"
            )),
        }
    }
}

/// Who is asked to approve a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApproverType {
    #[default]
    Manager,
    Hr,
}

impl ApproverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Hr => "hr",
        }
    }
}

impl fmt::Display for ApproverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApproverType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "hr" => Ok(Self::Hr),
            other => Err(format!(
                "unknown approver type '{other}' (expected manager or hr)"
            )),
        }
    }
}

/// Workflow status of a leave or overtime request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!(
                "unknown status '{other}' (expected pending, approved or rejected)"
            )),
        }
    }
}

/// Body of `POST /api/leave/request`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub approver_id: String,
    pub approver_type: ApproverType,
}

impl NewLeaveRequest {
    pub fn new(
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        approver_id: impl Into<String>,
    ) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            approver_id: approver_id.into(),
            ..Default::default()
        }
    }

    pub fn with_leave_type(mut self, leave_type: LeaveType) -> Self {
        self.leave_type = leave_type;
        self
    }

    pub fn with_approver_type(mut self, approver_type: ApproverType) -> Self {
        self.approver_type = approver_type;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_date.trim().is_empty()
            || self.end_date.trim().is_empty()
            || self.approver_id.trim().is_empty()
        {
            return Err(ApiError::validation("Please fill in all required fields"));
        }

        let start = parse_date(&self.start_date, "Start date")?;
        let end = parse_date(&self.end_date, "End date")?;
        if end < start {
            return Err(ApiError::validation(
                "End date cannot be before start date",
            ));
        }
        Ok(())
    }
}

/// Filters for [`Leave::requests`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(flatten)]
    pub paging: Paging,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceQuery<'q> {
    #[serde(skip_serializing_if = "Option::is_none")]
    employee_id: Option<&'q str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
}

#[derive(Serialize)]
pub(crate) struct ApproveBody<'b> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'b str>,
}

#[derive(Serialize)]
pub(crate) struct RejectBody<'b> {
    pub reason: &'b str,
}

/// A rejection must say why.
pub(crate) fn reject_reason(reason: &str) -> Result<&str> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ApiError::validation(
            "A reason is required to reject a request",
        ));
    }
    Ok(reason)
}

pub struct Leave<'a> {
    client: &'a ApiClient,
}

impl<'a> Leave<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Submits a leave request after validating it locally.
    pub async fn create_request(&self, request: &NewLeaveRequest) -> Result<Value> {
        request.validate()?;
        tracing::debug!(
            leave_type = %request.leave_type,
            start = %request.start_date,
            end = %request.end_date,
            "Submitting leave request"
        );
        self.client.post("/api/leave/request", request).await
    }

    pub async fn requests(&self, query: &LeaveQuery) -> Result<Value> {
        self.client.get_with_query("/api/leave/requests", query).await
    }

    pub async fn pending_requests(&self, paging: Paging) -> Result<Value> {
        self.client
            .get_with_query("/api/leave/requests/pending", &paging)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.get(&format!("/api/leave/request/{id}")).await
    }

    pub async fn approve(&self, id: &str, comment: Option<&str>) -> Result<Value> {
        self.client
            .post(
                &format!("/api/leave/request/{id}/approve"),
                &ApproveBody { comment },
            )
            .await
    }

    pub async fn reject(&self, id: &str, reason: &str) -> Result<Value> {
        let reason = reject_reason(reason)?;
        self.client
            .post(
                &format!("/api/leave/request/{id}/reject"),
                &RejectBody { reason },
            )
            .await
    }

    /// Requests waiting for the caller's decision.
    pub async fn pending_approvals(&self) -> Result<Value> {
        self.pending_approvals_page(Paging::default()).await
    }

    pub async fn pending_approvals_page(&self, paging: Paging) -> Result<Value> {
        self.client
            .get_with_query("/api/leave/approvals/pending", &paging)
            .await
    }

    pub async fn processed_approvals(&self, paging: Paging) -> Result<Value> {
        self.client
            .get_with_query("/api/leave/approvals/processed", &paging)
            .await
    }

    pub async fn balance(&self, employee_id: Option<&str>, year: Option<i32>) -> Result<Value> {
        self.client
            .get_with_query("/api/leave/balance", &BalanceQuery { employee_id, year })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_with_session;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_defaults() {
        let request = NewLeaveRequest::new("2024-03-01", "2024-03-05", "m-1");
        assert_eq!(request.leave_type, LeaveType::Annual);
        assert_eq!(request.approver_type, ApproverType::Manager);
    }

    #[test]
    fn test_validate() {
        assert!(NewLeaveRequest::new("2024-03-01", "2024-03-01", "m-1").validate().is_ok());

        let err = NewLeaveRequest::new("2024-03-05", "2024-03-01", "m-1")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "End date cannot be before start date");

        let err = NewLeaveRequest::new("2024-03-01", "2024-03-05", "  ")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");

        let err = NewLeaveRequest::new("March 1", "2024-03-05", "m-1")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Sick".parse::<LeaveType>().unwrap(), LeaveType::Sick);
        assert_eq!("hr".parse::<ApproverType>().unwrap(), ApproverType::Hr);
        assert_eq!("approved".parse::<RequestStatus>().unwrap(), RequestStatus::Approved);
        assert!("vacation".parse::<LeaveType>().is_err());
        assert_eq!(LeaveType::Unpaid.label(), "Unpaid Leave");
    }

    #[tokio::test]
    async fn test_create_request_body() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/leave/request"))
            .and(body_json(json!({
                "leaveType": "sick",
                "startDate": "2024-03-01",
                "endDate": "2024-03-02",
                "reason": "flu",
                "approverId": "hr-1",
                "approverType": "hr"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "l-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let request = NewLeaveRequest::new("2024-03-01", "2024-03-02", "hr-1")
            .with_leave_type(LeaveType::Sick)
            .with_approver_type(ApproverType::Hr)
            .with_reason("flu");
        let created = client.leave().create_request(&request).await.unwrap();
        assert_eq!(created["id"], "l-1");
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_sent() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let request = NewLeaveRequest::new("2024-03-10", "2024-03-01", "m-1");
        let err = client.leave().create_request(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/leave/request/l-1/reject"))
            .and(body_json(json!({ "reason": "team at capacity" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.leave().reject("l-1", "   ").await.unwrap_err();
        assert_eq!(err.to_string(), "A reason is required to reject a request");

        client
            .leave()
            .reject("l-1", " team at capacity ")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_approve_without_comment_sends_empty_object() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/leave/request/l-2/approve"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "approved" })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client.leave().approve("l-2", None).await.unwrap();
        assert_eq!(result["status"], "approved");
    }

    #[tokio::test]
    async fn test_requests_query() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/leave/requests"))
            .and(query_param("status", "pending"))
            .and(query_param("pageSize", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let query = LeaveQuery {
            status: Some(RequestStatus::Pending),
            paging: Paging::new(None, Some(10)),
            ..Default::default()
        };
        client.leave().requests(&query).await.unwrap();
    }

    #[tokio::test]
    async fn test_balance_query() {
        let server = MockServer::start().await;
        let (client, _) = client_with_session(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/leave/balance"))
            .and(query_param("year", "2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "annual": 12 })))
            .expect(1)
            .mount(&server)
            .await;

        let balance = client.leave().balance(None, Some(2024)).await.unwrap();
        assert_eq!(balance["annual"], 12);
    }
}
