//! Tally CLI - Personal finance tracker
//!
//! Usage:
//!   tally init                  Initialize database
//!   tally user add alice        Create a user account
//!   tally serve --port 3000     Start web server
//!   tally status                Show database status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
            purge_policy,
            session_ttl_hours,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                purge_policy.as_deref(),
                session_ttl_hours,
            )
            .await
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::User { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UserAction::Add { username, password } => {
                    commands::cmd_user_add(&db, &username, password.as_deref())
                }
                UserAction::List => commands::cmd_user_list(&db),
            }
        }
        Commands::Expenses { user, limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_expenses_list(&db, &user, limit)
        }
    }
}
