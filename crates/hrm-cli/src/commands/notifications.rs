use anyhow::Result;
use hrm_api::NotificationQuery;

use crate::cli::{NotificationCommands, OutputFormat};
use crate::output::{NOTIFICATION_COLUMNS, print_success, print_value};
use crate::session::AppContext;

pub async fn run(ctx: &AppContext, cmd: &NotificationCommands, format: OutputFormat) -> Result<()> {
    // Every signed-in user has notifications.
    let (client, _) = ctx.authorize(None).await?;
    let api = client.notifications();

    match cmd {
        NotificationCommands::List { unread_only, page } => {
            let query = NotificationQuery {
                unread_only: *unread_only,
                paging: page.into(),
            };
            let notifications = api.list(&query).await?;
            print_value(&notifications, Some(NOTIFICATION_COLUMNS), format)?;
        }
        NotificationCommands::Read { id } => {
            api.mark_read(id).await?;
            print_success(&format!("Marked notification {id} as read"));
        }
        NotificationCommands::ReadAll => {
            api.mark_all_read().await?;
            print_success("Marked all notifications as read");
        }
    }
    Ok(())
}
