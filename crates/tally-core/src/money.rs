//! Currency amount parsing and validation
//!
//! Amounts enter the system as user-supplied decimal strings ("12.34").
//! They are validated here before any core logic or storage sees them, so
//! the aggregation and limit code can assume well-formed two-decimal-place
//! positive values.

use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Maximum digits before the decimal point (mirrors the storage column)
const MAX_INTEGRAL_DIGITS: u32 = 10;

/// Parse a user-supplied currency amount.
///
/// Accepts at most two decimal places and requires a value greater than
/// zero. Exponent forms and lossy float round-trips are rejected by
/// `from_str_exact`.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let amount = Decimal::from_str_exact(input.trim())
        .map_err(|_| Error::InvalidData(format!("Invalid amount: {input:?}")))?;

    if amount <= Decimal::ZERO {
        return Err(Error::InvalidData(
            "Amount must be greater than zero".to_string(),
        ));
    }
    if amount.scale() > 2 {
        return Err(Error::InvalidData(
            "Amount may have at most 2 decimal places".to_string(),
        ));
    }
    if amount.trunc().to_string().trim_start_matches('-').len() as u32 > MAX_INTEGRAL_DIGITS {
        return Err(Error::InvalidData("Amount is too large".to_string()));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn parses_two_decimal_amounts() {
        assert_eq!(parse_amount("12.34").unwrap(), dec("12.34"));
        assert_eq!(parse_amount(" 5.50 ").unwrap(), dec("5.50"));
        assert_eq!(parse_amount("20").unwrap(), dec("20"));
    }

    #[test]
    fn rejects_non_positive() {
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("0.00").is_err());
        assert!(parse_amount("-3.50").is_err());
    }

    #[test]
    fn rejects_excess_precision_and_garbage() {
        assert!(parse_amount("1.999").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("1e3").is_err());
    }

    #[test]
    fn rejects_oversized_amounts() {
        assert!(parse_amount("99999999999.00").is_err());
        assert!(parse_amount("9999999999.99").is_ok());
    }
}
