//! Analytics handler: chart series over the caller's expenses
//!
//! When a daily limit is active, the series cover expenses from the day
//! the limit was set; otherwise the full history. Series values are exact
//! decimals ready for a pie (by description) and a line (by date) chart.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{AppError, AppState, AuthUser};
use tally_core::aggregate;
use tally_core::models::ChartSeries;

/// Spending analytics for the frontend charts
#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub total_spent: Decimal,
    /// Totals by description, first-seen order (pie chart)
    pub category_series: ChartSeries,
    /// Totals by date, first-seen order (line chart)
    pub date_series: ChartSeries,
    /// Start of the window when a daily limit restricts it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<NaiveDate>,
}

/// GET /api/analytics - Spending breakdown series
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let session = state
        .sessions
        .get(&auth.token)
        .await
        .ok_or_else(|| AppError::unauthorized("Session expired"))?;

    let since = session.daily_limit.map(|l| l.set_date);
    let expenses = state.db.list_expenses(auth.user_id, since)?;

    let report = AnalyticsReport {
        total_spent: aggregate::total_spent(&expenses),
        category_series: aggregate::to_series(aggregate::totals_by_description(&expenses)),
        date_series: aggregate::to_series(aggregate::totals_by_date(&expenses)),
        since,
    };

    Ok(Json(report))
}
