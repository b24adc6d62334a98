use anyhow::Result;
use hrm_api::EmployeeQuery;
use hrm_auth::Area;

use crate::cli::{DepartmentCommands, EmployeeCommands, OutputFormat, TeamCommands};
use crate::output::{EMPLOYEE_COLUMNS, TEAM_COLUMNS, print_success, print_value};
use crate::session::AppContext;

pub async fn employees(ctx: &AppContext, cmd: &EmployeeCommands, format: OutputFormat) -> Result<()> {
    let (client, _) = ctx.authorize(Some(Area::Employees)).await?;
    let api = client.employees();

    match cmd {
        EmployeeCommands::List(args) => {
            let query = EmployeeQuery {
                page: args.page.page,
                page_size: args.page.page_size,
                search: args.search.clone(),
                department_id: args.department_id.clone(),
                team_id: args.team_id.clone(),
                status: args.status.clone(),
            };
            let page = api.list(&query).await?;
            print_value(&page, Some(EMPLOYEE_COLUMNS), format)?;
        }
        EmployeeCommands::Get { id } => {
            let employee = api.get(id).await?;
            print_value(&employee, None, format)?;
        }
        EmployeeCommands::Delete { id } => {
            api.delete(id).await?;
            print_success(&format!("Deleted employee {id}"));
        }
    }
    Ok(())
}

pub async fn departments(
    ctx: &AppContext,
    cmd: &DepartmentCommands,
    format: OutputFormat,
) -> Result<()> {
    let (client, _) = ctx.authorize(Some(Area::Departments)).await?;

    match cmd {
        DepartmentCommands::List => {
            let departments = client.departments().list().await?;
            print_value(&departments, None, format)?;
        }
        DepartmentCommands::Teams { department_id } => {
            let teams = client.departments().teams(department_id).await?;
            print_value(&teams, Some(TEAM_COLUMNS), format)?;
        }
    }
    Ok(())
}

pub async fn teams(ctx: &AppContext, cmd: &TeamCommands, format: OutputFormat) -> Result<()> {
    let (client, _) = ctx.authorize(Some(Area::Teams)).await?;

    match cmd {
        TeamCommands::List { department_id } => {
            let teams = client.teams().list(department_id.as_deref()).await?;
            print_value(&teams, Some(TEAM_COLUMNS), format)?;
        }
        TeamCommands::Members { team_id } => {
            let members = client.teams().members(team_id).await?;
            print_value(&members, Some(EMPLOYEE_COLUMNS), format)?;
        }
    }
    Ok(())
}
