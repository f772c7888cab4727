//! Server command implementation

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};

use tally_core::limits::PurgePolicy;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    purge_policy: Option<&str>,
    session_ttl_hours: u64,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Purge policy: CLI flag > TALLY_PURGE_POLICY env > preserve-today
    let policy_str = purge_policy
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TALLY_PURGE_POLICY").ok().filter(|s| !s.is_empty()));
    let purge_policy = match policy_str {
        Some(s) => s
            .parse::<PurgePolicy>()
            .map_err(|e| anyhow!("{} (valid: preserve-today, keep-all, purge-all)", e))?,
        None => PurgePolicy::default(),
    };

    println!("   🧹 Limit purge policy: {}", purge_policy);
    println!("   ⏱️  Session TTL: {}h", session_ttl_hours);
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = tally_server::ServerConfig {
        allowed_origins: vec![],
        purge_policy,
        session_ttl: Duration::from_secs(session_ttl_hours * 60 * 60),
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().expect("static_dir path must be valid UTF-8"));
    tally_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
