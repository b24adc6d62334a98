use anyhow::Result;
use hrm_api::dates::{format_date, parse_date, today};
use hrm_api::{CheckInOut, HistoryQuery};
use hrm_auth::Area;

use crate::cli::{AttendanceCommands, CheckArgs, OutputFormat};
use crate::output::{ATTENDANCE_COLUMNS, print_success, print_value};
use crate::session::AppContext;

pub async fn run(ctx: &AppContext, cmd: &AttendanceCommands, format: OutputFormat) -> Result<()> {
    let area = match cmd {
        AttendanceCommands::Team { .. } => Area::TeamAttendance,
        AttendanceCommands::Shifts { .. } => Area::Shifts,
        _ => Area::Attendance,
    };
    let (client, user) = ctx.authorize(Some(area)).await?;
    let api = client.attendance();

    match cmd {
        AttendanceCommands::CheckIn(args) => {
            let record = api.check_in(&details(args)).await?;
            print_success(&format!("Checked in as {}", user.username));
            print_value(&record, None, format)?;
        }
        AttendanceCommands::CheckOut(args) => {
            let record = api.check_out(&details(args)).await?;
            print_success(&format!("Checked out as {}", user.username));
            print_value(&record, None, format)?;
        }
        AttendanceCommands::Status { employee_id, date } => {
            let date = day_or_today(date.as_deref())?;
            let status = api.status(employee_id.as_deref(), Some(date.as_str())).await?;
            print_value(&status, None, format)?;
        }
        AttendanceCommands::History(args) => {
            for date in [&args.start_date, &args.end_date].into_iter().flatten() {
                parse_date(date, "Date")?;
            }
            let query = HistoryQuery {
                employee_id: args.employee_id.clone(),
                start_date: args.start_date.clone(),
                end_date: args.end_date.clone(),
                page: args.page.page,
                page_size: args.page.page_size,
            };
            let history = api.history(&query).await?;
            print_value(&history, Some(ATTENDANCE_COLUMNS), format)?;
        }
        AttendanceCommands::Shifts { department_id } => {
            let shifts = api.shifts(department_id.as_deref()).await?;
            print_value(&shifts, None, format)?;
        }
        AttendanceCommands::Team { team_id, date } => {
            let date = day_or_today(date.as_deref())?;
            let records = api.team(team_id, Some(date.as_str())).await?;
            print_value(&records, None, format)?;
        }
    }
    Ok(())
}

fn details(args: &CheckArgs) -> CheckInOut {
    CheckInOut {
        note: args.note.clone(),
        latitude: args.latitude,
        longitude: args.longitude,
    }
}

/// Validated `YYYY-MM-DD` date, today when not given.
fn day_or_today(date: Option<&str>) -> Result<String> {
    Ok(match date {
        Some(date) => format_date(parse_date(date, "Date")?),
        None => format_date(today()),
    })
}
