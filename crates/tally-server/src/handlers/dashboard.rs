//! Dashboard handlers: today's spending against the session daily limit
//!
//! The daily limit is session state, so two tabs logged into different
//! sessions can see different limits; last write wins within a session.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, AuthUser};
use tally_core::aggregate;
use tally_core::limits::{DailyLimit, LimitStatus};
use tally_core::models::Expense;
use tally_core::money;

/// Query parameters for the dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// "1" (or "true") to include the remaining balance
    pub show_balance: Option<String>,
    /// "1" (or "true") to include today's expense list
    pub show_expenses: Option<String>,
}

/// Truthy check for the original form-style "?flag=1" parameters
fn flag(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true"))
}

/// The dashboard summary rendered by the frontend
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_today: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_set_date: Option<NaiveDate>,
    pub limit_exceeded: bool,
    /// Remaining allowance; present only when requested and a limit is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expenses_today: Option<Vec<Expense>>,
}

fn build_summary(
    state: &AppState,
    user_id: i64,
    limit: Option<&DailyLimit>,
    show_balance: bool,
    show_expenses: bool,
) -> Result<DashboardSummary, AppError> {
    let today = Utc::now().date_naive();
    let expenses_today = state.db.expenses_on(user_id, today)?;
    let total_today = aggregate::total_on(&expenses_today, today);

    let status = LimitStatus::evaluate(limit, total_today, show_balance);

    Ok(DashboardSummary {
        total_today,
        daily_limit: limit.map(|l| l.amount),
        limit_set_date: limit.map(|l| l.set_date),
        limit_exceeded: status.limit_exceeded,
        balance: status.balance,
        expenses_today: show_expenses.then_some(expenses_today),
    })
}

/// GET /api/dashboard - Today's total and limit status
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, AppError> {
    let session = state
        .sessions
        .get(&auth.token)
        .await
        .ok_or_else(|| AppError::unauthorized("Session expired"))?;

    let summary = build_summary(
        &state,
        auth.user_id,
        session.daily_limit.as_ref(),
        flag(&params.show_balance),
        flag(&params.show_expenses),
    )?;

    Ok(Json(summary))
}

/// Request body for setting the daily limit
#[derive(Debug, Deserialize)]
pub struct SetLimitRequest {
    /// Decimal string, e.g. "20.00"
    pub amount: String,
}

/// Response for a limit submission
#[derive(Serialize)]
pub struct SetLimitResponse {
    /// Expense rows removed by the purge policy
    pub purged: usize,
    /// Dashboard state recomputed after the purge, under the new limit
    pub dashboard: DashboardSummary,
}

/// POST /api/dashboard/limit - Set a new daily limit
///
/// Always replaces the previous limit and stamps it with today's date.
/// The server's purge policy is applied to the caller's historical
/// expenses before the refreshed summary is computed.
pub async fn set_daily_limit(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SetLimitRequest>,
) -> Result<Json<SetLimitResponse>, AppError> {
    let amount =
        money::parse_amount(&req.amount).map_err(|e| AppError::bad_request(&e.to_string()))?;

    let today = Utc::now().date_naive();
    let purged = state
        .db
        .purge_expenses(auth.user_id, state.config.purge_policy, today)?;

    let limit = DailyLimit::new(amount, today);
    if !state.sessions.set_daily_limit(&auth.token, limit).await {
        return Err(AppError::unauthorized("Session expired"));
    }

    info!(
        username = %auth.username,
        amount = %amount,
        policy = state.config.purge_policy.as_str(),
        purged,
        "Daily limit set"
    );

    let dashboard = build_summary(&state, auth.user_id, Some(&limit), false, false)?;

    Ok(Json(SetLimitResponse { purged, dashboard }))
}
