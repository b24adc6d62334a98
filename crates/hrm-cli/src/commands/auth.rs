use anyhow::Result;
use colored::Colorize;
use hrm_auth::{UserIdentity, decode_claims};
use time::OffsetDateTime;

use crate::cli::LoginArgs;
use crate::output::{print_error, print_success};
use crate::session::AppContext;

pub async fn login(ctx: &AppContext, args: &LoginArgs) -> Result<()> {
    let session = ctx.session_manager()?;
    println!("Logging in as {} to {}...", args.username, ctx.server.cyan());
    let active = session.login(&args.username, &args.password).await?;
    print_success(&format!(
        "Logged in as {} ({})",
        active.user.display_name().cyan(),
        active.user.roles.join(", ")
    ));
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    let session = ctx.session_manager()?;
    if !session.init().await? {
        println!("No session found for profile \"{}\"", ctx.profile);
        return Ok(());
    }
    session.logout().await?;
    print_success("Logged out (session removed)");
    Ok(())
}

/// Prints what the stored access token says, without contacting the server.
pub async fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.session_manager()?;
    session.init().await?;

    let Some(token) = session.get_access_token().await else {
        print_error(&format!("Not logged in (profile: \"{}\")", ctx.profile));
        return Ok(());
    };
    let claims = decode_claims(&token)?;
    let user = UserIdentity::from(claims.clone());

    println!("{}: {}", "Profile".cyan(), ctx.profile);
    println!("{}: {}", "Server".cyan(), ctx.server);
    print_identity(&user);
    match claims.expires_at() {
        Some(expires_at) if expires_at < OffsetDateTime::now_utc() => {
            println!("{}: {} ({})", "Expires".cyan(), expires_at, "expired".red());
        }
        Some(expires_at) => println!("{}: {}", "Expires".cyan(), expires_at),
        None => println!("{}: unknown", "Expires".cyan()),
    }
    Ok(())
}

/// Resumes the session, refreshing an expired access token once.
pub async fn status(ctx: &AppContext) -> Result<()> {
    let session = ctx.session_manager()?;
    match session.check_auth_status().await? {
        Some(active) => {
            println!("{} {} as {}", "✓".green(), "Authenticated".green(), active.user.username);
            print_identity(&active.user);
        }
        None => {
            println!("{} {}", "✗".red(), "Not authenticated".red());
        }
    }
    Ok(())
}

fn print_identity(user: &UserIdentity) {
    println!("{}: {} ({})", "User".cyan(), user.display_name(), user.username);
    if !user.email.is_empty() {
        println!("{}: {}", "Email".cyan(), user.email);
    }
    let roles = if user.roles.is_empty() {
        "(none)".to_string()
    } else {
        user.roles.join(", ")
    };
    println!("{}: {}", "Roles".cyan(), roles);
    let areas = user
        .accessible_areas()
        .iter()
        .map(|area| area.name())
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}: {}", "Access".cyan(), areas);
}
