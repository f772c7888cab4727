//! Expense listing command

use anyhow::{Context, Result};

use tally_core::db::Database;

use super::truncate;

pub fn cmd_expenses_list(db: &Database, username: &str, limit: i64) -> Result<()> {
    let user = db
        .get_user_by_username(username)?
        .with_context(|| format!("No such user: {}", username))?;

    let expenses = db.recent_expenses(user.id, limit.max(1), 0)?;

    if expenses.is_empty() {
        println!("No expenses logged for '{}'.", username);
        return Ok(());
    }

    println!();
    println!("💸 Expenses for {} (most recent first)", username);
    println!("   ──────────────────────────────────────────────");
    println!("   {:<12} {:>12}  {}", "Date", "Amount", "Description");

    for expense in &expenses {
        println!(
            "   {:<12} {:>12}  {}",
            expense.date,
            expense.amount,
            truncate(&expense.description, 40)
        );
    }

    println!();
    println!("   {} shown of {} total", expenses.len(), db.count_expenses(user.id)?);

    Ok(())
}
