//! Monthly budget operations

use rusqlite::params;

use super::{parse_amount_column, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Budget, NewBudget};

impl Database {
    /// Insert a budget for a user
    pub fn insert_budget(&self, user_id: i64, budget: &NewBudget) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, amount, month) VALUES (?1, ?2, ?3)",
            params![
                user_id,
                budget.amount.to_string(),
                budget.month.to_string(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's budgets, most recent month first
    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, amount, month, created_at
             FROM budgets WHERE user_id = ?1
             ORDER BY month DESC, id DESC",
        )?;
        let budgets = stmt
            .query_map(params![user_id], Self::row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    /// Count all budgets across users (status reporting)
    pub fn count_all_budgets(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to Budget
    /// Column order: id, user_id, amount, month, created_at
    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let amount_str: String = row.get(2)?;
        let month_str: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;
        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: parse_amount_column(&amount_str),
            month: chrono::NaiveDate::parse_from_str(&month_str, "%Y-%m-%d").unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
