//! Expense operations
//!
//! Queries materialize ordered `Vec<Expense>` slices for the aggregation
//! engine; the destructive `purge_expenses` implements the limit-reset
//! policies.

use chrono::NaiveDate;
use rusqlite::params;
use tracing::info;

use super::{parse_amount_column, parse_datetime, Database};
use crate::error::Result;
use crate::limits::PurgePolicy;
use crate::models::{Expense, NewExpense};

impl Database {
    /// Insert an expense for a user
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (user_id, amount, date, description) VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                expense.amount.to_string(),
                expense.date.to_string(),
                expense.description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's expenses ordered by date then insertion order
    ///
    /// When `since` is given, only expenses dated on or after it are
    /// returned (the analytics filter for an active daily limit).
    pub fn list_expenses(&self, user_id: i64, since: Option<NaiveDate>) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let (sql, has_since) = match since {
            Some(_) => (
                "SELECT id, user_id, amount, date, description, created_at
                 FROM expenses WHERE user_id = ?1 AND date >= ?2
                 ORDER BY date, id",
                true,
            ),
            None => (
                "SELECT id, user_id, amount, date, description, created_at
                 FROM expenses WHERE user_id = ?1
                 ORDER BY date, id",
                false,
            ),
        };

        let mut stmt = conn.prepare(sql)?;
        let expenses = if has_since {
            stmt.query_map(
                params![user_id, since.unwrap().to_string()],
                Self::row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map(params![user_id], Self::row_to_expense)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };

        Ok(expenses)
    }

    /// List a user's expenses dated exactly `day`
    pub fn expenses_on(&self, user_id: i64, day: NaiveDate) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, amount, date, description, created_at
             FROM expenses WHERE user_id = ?1 AND date = ?2
             ORDER BY id",
        )?;
        let expenses = stmt
            .query_map(params![user_id, day.to_string()], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Recent expenses for a user, newest first (API and CLI listings)
    pub fn recent_expenses(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, amount, date, description, created_at
             FROM expenses WHERE user_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2 OFFSET ?3",
        )?;
        let expenses = stmt
            .query_map(params![user_id, limit, offset], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Count a user's expenses
    pub fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count all expenses across users (status reporting)
    pub fn count_all_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Apply a limit-reset purge policy to a user's expenses
    ///
    /// Destructive. Returns the number of deleted rows. Only this user's
    /// records are ever touched.
    pub fn purge_expenses(
        &self,
        user_id: i64,
        policy: PurgePolicy,
        today: NaiveDate,
    ) -> Result<usize> {
        let conn = self.conn()?;

        let deleted = match policy {
            PurgePolicy::KeepAll => 0,
            PurgePolicy::PreserveToday => conn.execute(
                "DELETE FROM expenses WHERE user_id = ?1 AND date < ?2",
                params![user_id, today.to_string()],
            )?,
            PurgePolicy::PurgeAll => conn.execute(
                "DELETE FROM expenses WHERE user_id = ?1",
                params![user_id],
            )?,
        };

        if deleted > 0 {
            info!(
                user_id,
                policy = policy.as_str(),
                deleted,
                "Purged expenses on daily limit reset"
            );
        }

        Ok(deleted)
    }

    /// Helper to convert a row to Expense
    /// Column order: id, user_id, amount, date, description, created_at
    pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let amount_str: String = row.get(2)?;
        let date_str: String = row.get(3)?;
        let created_at_str: String = row.get(5)?;
        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: parse_amount_column(&amount_str),
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
            description: row.get(4)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
