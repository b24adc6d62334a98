use anyhow::Result;
use hrm_api::dates::{format_date, today};
use hrm_api::{NewOvertimeRequest, OvertimeQuery, format_minutes};
use hrm_auth::Area;

use crate::cli::{OutputFormat, OvertimeCommands};
use crate::output::{OVERTIME_COLUMNS, print_success, print_value};
use crate::session::AppContext;

pub async fn run(ctx: &AppContext, cmd: &OvertimeCommands, format: OutputFormat) -> Result<()> {
    let area = match cmd {
        OvertimeCommands::Pending(_) | OvertimeCommands::Approve(_) | OvertimeCommands::Reject(_) => {
            Area::Approvals
        }
        _ => Area::Overtime,
    };
    let (client, _) = ctx.authorize(Some(area)).await?;
    let api = client.overtime();

    match cmd {
        OvertimeCommands::Request(args) => {
            let date = args.date.clone().unwrap_or_else(|| format_date(today()));
            let mut request = NewOvertimeRequest::new(&date, &args.start_time, &args.end_time)?;
            if let Some(reason) = &args.reason {
                request = request.with_reason(reason);
            }
            let created = api.create_request(&request).await?;
            print_success(&format!(
                "Submitted {} of overtime on {}",
                format_minutes(request.total_minutes),
                request.date
            ));
            print_value(&created, None, format)?;
        }
        OvertimeCommands::List {
            employee_id,
            status,
            start_date,
            end_date,
            page,
        } => {
            let query = OvertimeQuery {
                employee_id: employee_id.clone(),
                status: *status,
                start_date: start_date.clone(),
                end_date: end_date.clone(),
                paging: page.into(),
            };
            let requests = api.requests(&query).await?;
            print_value(&requests, Some(OVERTIME_COLUMNS), format)?;
        }
        OvertimeCommands::Pending(page) => {
            let pending = api.pending_requests(page.into()).await?;
            print_value(&pending, Some(OVERTIME_COLUMNS), format)?;
        }
        OvertimeCommands::Approve(args) => {
            api.approve(&args.id, args.comment.as_deref()).await?;
            print_success(&format!("Approved overtime request {}", args.id));
        }
        OvertimeCommands::Reject(args) => {
            api.reject(&args.id, &args.reason).await?;
            print_success(&format!("Rejected overtime request {}", args.id));
        }
    }
    Ok(())
}
