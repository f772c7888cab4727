//! Expense aggregation
//!
//! Pure grouping and summation over a materialized, date-ordered slice of
//! expenses. Callers fetch the slice from the database layer; nothing here
//! touches a connection. All arithmetic is exact decimal, so totals are
//! precise to the stored two decimal places.

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::models::{ChartSeries, Expense};

/// Sum of amounts dated exactly `day`. Zero for an empty slice.
pub fn total_on(expenses: &[Expense], day: NaiveDate) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.date == day)
        .map(|e| e.amount)
        .sum()
}

/// Sum of all amounts in the slice.
pub fn total_spent(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Totals grouped by description, keyed in first-seen order.
///
/// An empty description is a real group: expenses logged without a
/// description accumulate under the empty-string key rather than being
/// dropped.
pub fn totals_by_description(expenses: &[Expense]) -> IndexMap<String, Decimal> {
    let mut totals: IndexMap<String, Decimal> = IndexMap::new();
    for expense in expenses {
        *totals
            .entry(expense.description.clone())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
}

/// Totals grouped by calendar date, keyed by the canonical `YYYY-MM-DD`
/// rendering in first-seen order.
pub fn totals_by_date(expenses: &[Expense]) -> IndexMap<String, Decimal> {
    let mut totals: IndexMap<String, Decimal> = IndexMap::new();
    for expense in expenses {
        *totals
            .entry(expense.date.format("%Y-%m-%d").to_string())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
}

/// Convert an aggregation map into parallel chart arrays.
pub fn to_series(totals: IndexMap<String, Decimal>) -> ChartSeries {
    let mut series = ChartSeries::default();
    for (label, value) in totals {
        series.labels.push(label);
        series.values.push(value);
    }
    series
}
