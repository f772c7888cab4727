//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser, CreatedResponse, MAX_PAGE_LIMIT};
use tally_core::models::{Expense, NewExpense};
use tally_core::money;

/// Request body for logging an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Decimal string, e.g. "12.34"; at most 2 decimal places
    pub amount: String,
    /// Defaults to today (YYYY-MM-DD)
    pub date: Option<String>,
    /// Defaults to empty; empty descriptions are kept, not dropped
    pub description: Option<String>,
}

/// POST /api/expenses - Log an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let amount =
        money::parse_amount(&req.amount).map_err(|e| AppError::bad_request(&e.to_string()))?;

    let date = match req.date.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::bad_request("Invalid date format (use YYYY-MM-DD)"))?,
        None => Utc::now().date_naive(),
    };

    let expense = NewExpense {
        amount,
        date,
        description: req.description.unwrap_or_default(),
    };

    let id = state.db.insert_expense(auth.user_id, &expense)?;

    Ok(Json(CreatedResponse { id }))
}

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/expenses - List the caller's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.max(1).min(MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let expenses = state.db.recent_expenses(auth.user_id, limit, offset)?;
    let total = state.db.count_expenses(auth.user_id)?;

    Ok(Json(ExpenseListResponse {
        expenses,
        total,
        limit,
        offset,
    }))
}
