//! Savings goal operations

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{parse_amount_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{FinancialGoal, NewFinancialGoal};

impl Database {
    /// Insert a goal for a user (current progress starts at zero)
    pub fn insert_goal(&self, user_id: i64, goal: &NewFinancialGoal) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO financial_goals (user_id, name, target_amount, deadline)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                goal.name,
                goal.target_amount.to_string(),
                goal.deadline.to_string(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's goals, nearest deadline first
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<FinancialGoal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, target_amount, current_amount, deadline, created_at
             FROM financial_goals WHERE user_id = ?1
             ORDER BY deadline, id",
        )?;
        let goals = stmt
            .query_map(params![user_id], Self::row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Get one of a user's goals by id
    pub fn get_goal(&self, user_id: i64, goal_id: i64) -> Result<Option<FinancialGoal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                "SELECT id, user_id, name, target_amount, current_amount, deadline, created_at
                 FROM financial_goals WHERE id = ?1 AND user_id = ?2",
                params![goal_id, user_id],
                Self::row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// Add saved money to a goal's progress, returning the updated goal
    pub fn add_goal_progress(
        &self,
        user_id: i64,
        goal_id: i64,
        amount: Decimal,
    ) -> Result<FinancialGoal> {
        let goal = self
            .get_goal(user_id, goal_id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {} not found", goal_id)))?;

        let updated = goal.current_amount + amount;
        let conn = self.conn()?;
        conn.execute(
            "UPDATE financial_goals SET current_amount = ?1 WHERE id = ?2 AND user_id = ?3",
            params![updated.to_string(), goal_id, user_id],
        )?;

        Ok(FinancialGoal {
            current_amount: updated,
            ..goal
        })
    }

    /// Count all goals across users (status reporting)
    pub fn count_all_goals(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM financial_goals", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to FinancialGoal
    /// Column order: id, user_id, name, target_amount, current_amount, deadline, created_at
    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<FinancialGoal> {
        let target_str: String = row.get(3)?;
        let current_str: String = row.get(4)?;
        let deadline_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        Ok(FinancialGoal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            target_amount: parse_amount_column(&target_str),
            current_amount: parse_amount_column(&current_str),
            deadline: chrono::NaiveDate::parse_from_str(&deadline_str, "%Y-%m-%d")
                .unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
