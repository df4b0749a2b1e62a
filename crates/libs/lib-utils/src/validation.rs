//! # Validation Utilities
//!
//! Input validation helpers for request fields and monetary amounts.

use rust_decimal::Decimal;

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a stake amount: strictly positive, at most 2 fraction digits.
pub fn validate_stake(amount: Decimal, field_name: &str) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err(format!("{} must be positive", field_name));
    }
    validate_scale(amount, field_name)
}

/// Validate a win amount: zero or positive, at most 2 fraction digits.
pub fn validate_win_amount(amount: Decimal, field_name: &str) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("{} cannot be negative", field_name));
    }
    validate_scale(amount, field_name)
}

fn validate_scale(amount: Decimal, field_name: &str) -> Result<(), String> {
    if amount.normalize().scale() > 2 {
        Err(format!("{} has more than 2 fraction digits", field_name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("abc", "field").is_ok());
        assert!(validate_not_empty("  ", "field").is_err());
    }

    #[test]
    fn test_validate_stake() {
        assert!(validate_stake(Decimal::from_str("10.50").unwrap(), "amount").is_ok());
        assert!(validate_stake(Decimal::ZERO, "amount").is_err());
        assert!(validate_stake(Decimal::from_str("-1").unwrap(), "amount").is_err());
        assert!(validate_stake(Decimal::from_str("0.005").unwrap(), "amount").is_err());
    }

    #[test]
    fn test_validate_win_amount_allows_zero() {
        assert!(validate_win_amount(Decimal::ZERO, "winAmount").is_ok());
        assert!(validate_win_amount(Decimal::from_str("-0.01").unwrap(), "winAmount").is_err());
    }

    #[test]
    fn test_trailing_zeros_do_not_fail_scale_check() {
        assert!(validate_stake(Decimal::from_str("1.100").unwrap(), "amount").is_ok());
    }
}
