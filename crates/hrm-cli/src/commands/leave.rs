use anyhow::Result;
use colored::Colorize;
use hrm_api::{LeaveQuery, NewLeaveRequest};
use hrm_auth::Area;

use crate::cli::{LeaveCommands, OutputFormat};
use crate::output::{LEAVE_COLUMNS, print_success, print_value};
use crate::session::AppContext;

pub async fn run(ctx: &AppContext, cmd: &LeaveCommands, format: OutputFormat) -> Result<()> {
    let area = match cmd {
        LeaveCommands::Pending(_)
        | LeaveCommands::Processed(_)
        | LeaveCommands::Approve(_)
        | LeaveCommands::Reject(_) => Area::Approvals,
        _ => Area::Leave,
    };
    let (client, _) = ctx.authorize(Some(area)).await?;
    let api = client.leave();

    match cmd {
        LeaveCommands::Request(args) => {
            let mut request = NewLeaveRequest::new(&args.start_date, &args.end_date, &args.approver_id)
                .with_leave_type(args.leave_type)
                .with_approver_type(args.approver_type);
            if let Some(reason) = &args.reason {
                request = request.with_reason(reason);
            }
            let created = api.create_request(&request).await?;
            print_success(&format!(
                "Submitted {} from {} to {}",
                args.leave_type.label().cyan(),
                args.start_date,
                args.end_date
            ));
            print_value(&created, None, format)?;
        }
        LeaveCommands::List {
            employee_id,
            status,
            page,
        } => {
            let query = LeaveQuery {
                employee_id: employee_id.clone(),
                status: *status,
                paging: page.into(),
            };
            let requests = api.requests(&query).await?;
            print_value(&requests, Some(LEAVE_COLUMNS), format)?;
        }
        LeaveCommands::Pending(page) => {
            let pending = api.pending_approvals_page(page.into()).await?;
            print_value(&pending, Some(LEAVE_COLUMNS), format)?;
        }
        LeaveCommands::Processed(page) => {
            let processed = api.processed_approvals(page.into()).await?;
            print_value(&processed, Some(LEAVE_COLUMNS), format)?;
        }
        LeaveCommands::Approve(args) => {
            api.approve(&args.id, args.comment.as_deref()).await?;
            print_success(&format!("Approved leave request {}", args.id));
        }
        LeaveCommands::Reject(args) => {
            api.reject(&args.id, &args.reason).await?;
            print_success(&format!("Rejected leave request {}", args.id));
        }
        LeaveCommands::Balance { employee_id, year } => {
            let balance = api.balance(employee_id.as_deref(), *year).await?;
            print_value(&balance, None, format)?;
        }
    }
    Ok(())
}
