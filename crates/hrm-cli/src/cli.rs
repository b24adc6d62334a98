use clap::{Parser, Subcommand, ValueEnum};
use hrm_api::{ApproverType, LeaveType, RequestStatus};

#[derive(Parser)]
#[command(name = "hrm")]
#[command(about = "HRM CLI: attendance, leave, overtime and people data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and HRM_API_URL env var)
    #[arg(short, long, global = true, env = "HRM_API_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "HRM_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Csv,
    Tsv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with username and password
    Login(LoginArgs),
    /// Log out and remove the stored session
    Logout,
    /// Show the identity, roles and token expiry of the current session
    Whoami,
    /// Check the session, refreshing the access token if needed
    Status,
    /// Employee directory
    #[command(subcommand)]
    Employees(EmployeeCommands),
    /// Departments
    #[command(subcommand)]
    Departments(DepartmentCommands),
    /// Teams
    #[command(subcommand)]
    Teams(TeamCommands),
    /// Check-in, check-out and attendance records
    #[command(subcommand)]
    Attendance(AttendanceCommands),
    /// Leave requests and approvals
    #[command(subcommand)]
    Leave(LeaveCommands),
    /// Overtime requests and approvals
    #[command(subcommand)]
    Overtime(OvertimeCommands),
    /// Notifications
    #[command(subcommand)]
    Notifications(NotificationCommands),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,
    /// Password
    #[arg(long, env = "HRM_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Default)]
pub struct PageArgs {
    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
    /// Results per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl From<&PageArgs> for hrm_api::Paging {
    fn from(args: &PageArgs) -> Self {
        hrm_api::Paging::new(args.page, args.page_size)
    }
}

#[derive(Subcommand)]
pub enum EmployeeCommands {
    /// List employees
    List(EmployeeListArgs),
    /// Show one employee
    Get { id: String },
    /// Delete an employee
    Delete { id: String },
}

#[derive(clap::Args)]
pub struct EmployeeListArgs {
    /// Free text search
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub department_id: Option<String>,
    #[arg(long)]
    pub team_id: Option<String>,
    /// Employment status
    #[arg(long)]
    pub status: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Subcommand)]
pub enum DepartmentCommands {
    /// List departments
    List,
    /// List the teams of a department
    Teams { department_id: String },
}

#[derive(Subcommand)]
pub enum TeamCommands {
    /// List teams
    List {
        #[arg(long)]
        department_id: Option<String>,
    },
    /// List the members of a team
    Members { team_id: String },
}

#[derive(Subcommand)]
pub enum AttendanceCommands {
    /// Record a check-in
    CheckIn(CheckArgs),
    /// Record a check-out
    CheckOut(CheckArgs),
    /// Attendance status for a day
    Status {
        #[arg(long)]
        employee_id: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Attendance history
    History(HistoryArgs),
    /// Shift definitions
    Shifts {
        #[arg(long)]
        department_id: Option<String>,
    },
    /// Attendance of a whole team for a day
    Team {
        team_id: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(clap::Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,
}

#[derive(clap::Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub employee_id: Option<String>,
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,
    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Subcommand)]
pub enum LeaveCommands {
    /// Submit a leave request
    Request(LeaveRequestArgs),
    /// List leave requests
    List {
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        status: Option<RequestStatus>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Requests waiting for your approval
    Pending(PageArgs),
    /// Requests you already approved or rejected
    Processed(PageArgs),
    /// Approve a request
    Approve(ApproveArgs),
    /// Reject a request
    Reject(RejectArgs),
    /// Leave balance
    Balance {
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(clap::Args)]
pub struct LeaveRequestArgs {
    /// annual, sick or unpaid
    #[arg(long, default_value = "annual")]
    pub leave_type: LeaveType,
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: String,
    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: String,
    #[arg(long)]
    pub reason: Option<String>,
    /// Employee id of the approver
    #[arg(long)]
    pub approver_id: String,
    /// manager or hr
    #[arg(long, default_value = "manager")]
    pub approver_type: ApproverType,
}

#[derive(clap::Args)]
pub struct ApproveArgs {
    pub id: String,
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(clap::Args)]
pub struct RejectArgs {
    pub id: String,
    #[arg(long)]
    pub reason: String,
}

#[derive(Subcommand)]
pub enum OvertimeCommands {
    /// Submit an overtime request
    Request(OvertimeRequestArgs),
    /// List overtime requests
    List {
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        status: Option<RequestStatus>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Requests waiting for your approval
    Pending(PageArgs),
    /// Approve a request
    Approve(ApproveArgs),
    /// Reject a request
    Reject(RejectArgs),
}

#[derive(clap::Args)]
pub struct OvertimeRequestArgs {
    /// Day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Start time (HH:MM)
    #[arg(long, default_value = "18:00")]
    pub start_time: String,
    /// End time (HH:MM)
    #[arg(long, default_value = "20:00")]
    pub end_time: String,
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List notifications
    List {
        #[arg(long)]
        unread_only: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Mark one notification as read
    Read { id: String },
    /// Mark every notification as read
    ReadAll,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format)
    pub key: String,
    /// Value
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_leave_request() {
        let cli = Cli::try_parse_from([
            "hrm",
            "leave",
            "request",
            "--start-date",
            "2024-03-01",
            "--end-date",
            "2024-03-02",
            "--approver-id",
            "m-1",
            "--leave-type",
            "sick",
        ])
        .unwrap();
        let Commands::Leave(LeaveCommands::Request(args)) = cli.command else {
            panic!("expected leave request");
        };
        assert_eq!(args.leave_type, LeaveType::Sick);
        assert_eq!(args.approver_type, ApproverType::Manager);
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::try_parse_from(["hrm", "teams", "list", "--format", "csv"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Csv));
        assert_eq!(cli.log_level, "warn");
    }
}
