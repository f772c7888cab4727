//! Budget handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, CreatedResponse};
use tally_core::models::{Budget, NewBudget};
use tally_core::money;

/// Request body for setting a monthly budget
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Decimal string, e.g. "500.00"
    pub amount: String,
    /// Any day in the budgeted month (YYYY-MM-DD); normalized to day 1
    pub month: String,
}

/// POST /api/budgets - Set a budget for a month
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateBudgetRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let amount =
        money::parse_amount(&req.amount).map_err(|e| AppError::bad_request(&e.to_string()))?;

    let month = NaiveDate::parse_from_str(&req.month, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("Invalid month format (use YYYY-MM-DD)"))?;
    // Store the first of the month as the canonical month key
    let month = month.with_day(1).unwrap_or(month);

    let id = state
        .db
        .insert_budget(auth.user_id, &NewBudget { amount, month })?;

    Ok(Json(CreatedResponse { id }))
}

/// GET /api/budgets - List the caller's budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let budgets = state.db.list_budgets(auth.user_id)?;
    Ok(Json(budgets))
}
