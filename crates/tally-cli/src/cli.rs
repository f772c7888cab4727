//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses, budgets, and savings goals
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// What happens to past expenses when a daily limit is set:
        /// preserve-today, keep-all, purge-all
        ///
        /// Defaults to the TALLY_PURGE_POLICY environment variable, then
        /// preserve-today. The purge is destructive, so pick deliberately.
        #[arg(long)]
        purge_policy: Option<String>,

        /// Session lifetime in hours since last activity
        #[arg(long, default_value = "24")]
        session_ttl_hours: u64,
    },

    /// Show database status (encryption, row counts)
    Status,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// List a user's recent expenses
    Expenses {
        /// Username whose expenses to list
        #[arg(long)]
        user: String,

        /// Number of expenses to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user account
    Add {
        /// Username for the new account
        username: String,

        /// Password (prompted interactively when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// List user accounts
    List,
}
