//! # hrm-api
//!
//! Typed client for the HRM REST API. Requests go through [`ApiClient`],
//! which takes its bearer token from an [`hrm_auth::SessionManager`].
//!
//! Endpoint groups borrow the client:
//!
//! ```no_run
//! # async fn demo(client: hrm_api::ApiClient) -> hrm_api::Result<()> {
//! let pending = client.leave().pending_approvals().await?;
//! # Ok(())
//! # }
//! ```

pub mod attendance;
pub mod client;
pub mod dates;
pub mod employees;
pub mod error;
pub mod leave;
pub mod notifications;
pub mod organization;
pub mod overtime;

pub use attendance::{Attendance, CheckInOut, HistoryQuery};
pub use client::{ApiClient, Paging};
pub use employees::{EmployeeQuery, Employees};
pub use error::{ApiError, Result};
pub use leave::{ApproverType, Leave, LeaveQuery, LeaveType, NewLeaveRequest, RequestStatus};
pub use notifications::{NotificationQuery, Notifications};
pub use organization::{Departments, Teams};
pub use overtime::{NewOvertimeRequest, Overtime, OvertimeQuery, format_minutes};
