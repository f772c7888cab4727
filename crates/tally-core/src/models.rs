//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered user account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string; never serialized to API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A logged expense, owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    /// Exact currency amount, 2 decimal places
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Free text; may be empty
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Expense fields supplied at creation time
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

/// A monthly budget amount
#[derive(Debug, Clone, Serialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    /// First day of the budgeted month
    pub month: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub amount: Decimal,
    pub month: NaiveDate,
}

/// A savings goal with progress tracking
#[derive(Debug, Clone, Serialize)]
pub struct FinancialGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFinancialGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: NaiveDate,
}

/// Parallel label/value arrays for a chart, labels in first-seen order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}
