mod cli;
mod commands;
mod config;
mod logging;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, ConfigCommands};
use output::print_error;
use session::AppContext;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing_with_level(&cli.log_level);

    let profile_cfg = config::load_profile(&cli.profile)?;
    let format = cli
        .format
        .or_else(|| profile_cfg.output_format())
        .unwrap_or_default();
    let ctx = AppContext {
        profile: cli.profile.clone(),
        server: config::resolve_server(cli.server.as_deref(), &profile_cfg),
    };

    match &cli.command {
        Commands::Login(args) => commands::auth::login(&ctx, args).await?,
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::Status => commands::auth::status(&ctx).await?,
        Commands::Employees(cmd) => commands::directory::employees(&ctx, cmd, format).await?,
        Commands::Departments(cmd) => commands::directory::departments(&ctx, cmd, format).await?,
        Commands::Teams(cmd) => commands::directory::teams(&ctx, cmd, format).await?,
        Commands::Attendance(cmd) => commands::attendance::run(&ctx, cmd, format).await?,
        Commands::Leave(cmd) => commands::leave::run(&ctx, cmd, format).await?,
        Commands::Overtime(cmd) => commands::overtime::run(&ctx, cmd, format).await?,
        Commands::Notifications(cmd) => commands::notifications::run(&ctx, cmd, format).await?,
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => {
                println!("{}: {}", "Profile".cyan(), cli.profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    profile_cfg.server.as_deref().unwrap_or("(not set)")
                );
                println!("{}: {}", "Resolved server".cyan(), ctx.server);
                println!(
                    "{}: {}",
                    "Format".cyan(),
                    profile_cfg
                        .output_format()
                        .unwrap_or_default()
                        .as_str()
                );
            }
            ConfigCommands::Set(set_args) => {
                let mut cfg = profile_cfg.clone();
                cfg.set(&set_args.key, &set_args.value)?;
                config::save_profile(&cli.profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
    }

    Ok(())
}
