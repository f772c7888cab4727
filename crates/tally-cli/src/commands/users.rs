//! User account commands

use anyhow::{Context, Result};

use tally_core::db::Database;

/// Create a user account, prompting for the password when not supplied
pub fn cmd_user_add(db: &Database, username: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => {
            let first = rpassword::prompt_password("Password: ")?;
            let second = rpassword::prompt_password("Confirm password: ")?;
            if first != second {
                anyhow::bail!("Passwords do not match");
            }
            first
        }
    };

    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let id = db
        .create_user(username, &password)
        .context("Failed to create user")?;

    println!("✅ Created user '{}' (id {})", username.trim(), id);
    Ok(())
}

pub fn cmd_user_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Create one with:");
        println!("  tally user add <username>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────");

    for user in users {
        println!(
            "   {:<4} {:<24} since {}",
            user.id,
            user.username,
            user.created_at.format("%Y-%m-%d")
        );
    }

    println!();
    Ok(())
}
