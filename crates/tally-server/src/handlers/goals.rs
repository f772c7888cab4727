//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser, CreatedResponse};
use tally_core::models::{FinancialGoal, NewFinancialGoal};
use tally_core::money;
use tally_core::Error;

/// Request body for creating a savings goal
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    /// Decimal string, e.g. "1000.00"
    pub target_amount: String,
    /// YYYY-MM-DD
    pub deadline: String,
}

/// POST /api/goals - Create a savings goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Goal name must not be empty"));
    }

    let target_amount = money::parse_amount(&req.target_amount)
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    let deadline = NaiveDate::parse_from_str(&req.deadline, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("Invalid deadline format (use YYYY-MM-DD)"))?;

    let id = state.db.insert_goal(
        auth.user_id,
        &NewFinancialGoal {
            name: name.to_string(),
            target_amount,
            deadline,
        },
    )?;

    Ok(Json(CreatedResponse { id }))
}

/// GET /api/goals - List the caller's goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FinancialGoal>>, AppError> {
    let goals = state.db.list_goals(auth.user_id)?;
    Ok(Json(goals))
}

/// Request body for recording saved money against a goal
#[derive(Debug, Deserialize)]
pub struct GoalProgressRequest {
    /// Decimal string, e.g. "50.00"
    pub amount: String,
}

/// POST /api/goals/:id/progress - Add to a goal's saved amount
pub async fn add_goal_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<GoalProgressRequest>,
) -> Result<Json<FinancialGoal>, AppError> {
    let amount =
        money::parse_amount(&req.amount).map_err(|e| AppError::bad_request(&e.to_string()))?;

    let goal = state
        .db
        .add_goal_progress(auth.user_id, id, amount)
        .map_err(|e| match e {
            Error::NotFound(msg) => AppError::not_found(&msg),
            other => other.into(),
        })?;

    Ok(Json(goal))
}
