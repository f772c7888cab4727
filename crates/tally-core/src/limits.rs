//! Daily spending limit evaluation
//!
//! The limit itself lives in session state owned by the server; this module
//! is the pure decision logic. A user is either in the no-limit state (the
//! default) or has a limit with the date it was set. Setting a new limit
//! always wins over the old one and triggers the configured purge policy
//! against historical expenses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A daily spending ceiling, as held in the user's session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLimit {
    pub amount: Decimal,
    /// Day the limit was last set; analytics filter to expenses on or
    /// after this date
    pub set_date: NaiveDate,
}

impl DailyLimit {
    pub fn new(amount: Decimal, set_date: NaiveDate) -> Self {
        Self { amount, set_date }
    }
}

/// Outcome of evaluating today's spending against the limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimitStatus {
    /// True iff today's total is strictly greater than the limit.
    /// Spending exactly the limit is not an overrun.
    pub limit_exceeded: bool,
    /// Remaining allowance (`limit - total_today`, may be negative).
    /// Only computed when the caller asked to see it, and never without
    /// a limit set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
}

impl LimitStatus {
    /// Evaluate `total_today` against an optional limit.
    pub fn evaluate(limit: Option<&DailyLimit>, total_today: Decimal, show_balance: bool) -> Self {
        match limit {
            None => Self {
                limit_exceeded: false,
                balance: None,
            },
            Some(limit) => Self {
                limit_exceeded: total_today > limit.amount,
                balance: show_balance.then(|| limit.amount - total_today),
            },
        }
    }
}

/// What happens to historical expenses when a new daily limit is set.
///
/// The reset is destructive, so the policy is explicit server
/// configuration rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PurgePolicy {
    /// Delete the user's expenses dated strictly before today, keeping
    /// today's entries so the running daily total stays meaningful.
    #[default]
    PreserveToday,
    /// Delete nothing.
    KeepAll,
    /// Delete all of the user's expenses.
    PurgeAll,
}

impl PurgePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreserveToday => "preserve-today",
            Self::KeepAll => "keep-all",
            Self::PurgeAll => "purge-all",
        }
    }
}

impl std::str::FromStr for PurgePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve-today" | "preserve_today" => Ok(Self::PreserveToday),
            "keep-all" | "keep_all" | "none" => Ok(Self::KeepAll),
            "purge-all" | "purge_all" => Ok(Self::PurgeAll),
            _ => Err(format!("Unknown purge policy: {}", s)),
        }
    }
}

impl std::fmt::Display for PurgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn limit(amount: &str) -> DailyLimit {
        DailyLimit::new(dec(amount), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn no_limit_is_never_exceeded() {
        let status = LimitStatus::evaluate(None, dec("1000.00"), true);
        assert!(!status.limit_exceeded);
        assert!(status.balance.is_none());
    }

    #[test]
    fn equal_spend_is_not_exceeded() {
        let status = LimitStatus::evaluate(Some(&limit("20.00")), dec("20.00"), false);
        assert!(!status.limit_exceeded);
    }

    #[test]
    fn one_cent_over_is_exceeded() {
        let status = LimitStatus::evaluate(Some(&limit("20.00")), dec("20.01"), false);
        assert!(status.limit_exceeded);
    }

    #[test]
    fn balance_only_when_requested() {
        let hidden = LimitStatus::evaluate(Some(&limit("20.00")), dec("5.00"), false);
        assert!(hidden.balance.is_none());

        let shown = LimitStatus::evaluate(Some(&limit("20.00")), dec("5.00"), true);
        assert_eq!(shown.balance, Some(dec("15.00")));
    }

    #[test]
    fn balance_may_go_negative() {
        let status = LimitStatus::evaluate(Some(&limit("20.00")), dec("25.50"), true);
        assert!(status.limit_exceeded);
        assert_eq!(status.balance, Some(dec("-5.50")));
    }

    #[test]
    fn purge_policy_round_trips_through_strings() {
        for policy in [
            PurgePolicy::PreserveToday,
            PurgePolicy::KeepAll,
            PurgePolicy::PurgeAll,
        ] {
            let parsed: PurgePolicy = policy.as_str().parse().unwrap();
            assert_eq!(parsed, policy);
        }
        assert!("sometimes".parse::<PurgePolicy>().is_err());
    }

    #[test]
    fn default_policy_preserves_today() {
        assert_eq!(PurgePolicy::default(), PurgePolicy::PreserveToday);
    }
}
