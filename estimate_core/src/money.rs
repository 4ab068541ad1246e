//! # Money Helpers
//!
//! Amounts are carried as plain `f64` through every calculation so that the
//! six-step soft-cost chain never compounds rounding error. Rounding happens
//! exactly once, at the reporting boundary, through [`round_currency`].
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::money::{format_amount, round_currency};
//!
//! assert_eq!(round_currency(12074.9475), 12074.95);
//! assert_eq!(format_amount(12074.9475, "$"), "$12,074.95");
//! ```

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Digits after the decimal point for the reporting currency (cents).
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// Round an amount to the currency's minor unit, half away from zero.
///
/// The value is rounded as the decimal number it prints as, so `0.125`
/// becomes `0.13` even though its binary representation sits slightly
/// below the midpoint. Values outside `Decimal` range fall back to plain
/// float rounding.
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    match Decimal::from_str(&value.to_string()) {
        Ok(decimal) => decimal
            .round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        Err(_) => (value * 100.0).round() / 100.0,
    }
}

/// Format an amount for display with a currency symbol and thousands
/// separators, e.g. `-$1,234.50`.
pub fn format_amount(value: f64, symbol: &str) -> String {
    let rounded = round_currency(value);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{symbol}{grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_currency(0.125), 0.13);
        assert_eq!(round_currency(2.675), 2.68);
        assert_eq!(round_currency(-0.125), -0.13);
        assert_eq!(round_currency(336.0), 336.0);
    }

    #[test]
    fn test_round_uses_printed_value() {
        // 10454.5 * 1.05 lands just under the midpoint in binary
        assert_eq!(round_currency(10977.224999999999), 10977.22);
        assert_eq!(round_currency(10454.499999999998), 10454.5);
    }

    #[test]
    fn test_round_non_finite_passthrough() {
        assert!(round_currency(f64::NAN).is_nan());
        assert_eq!(round_currency(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_round_out_of_decimal_range() {
        let huge = 1.0e30;
        assert!(((round_currency(huge) - huge) / huge).abs() < 1e-12);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0, "$"), "$0.00");
        assert_eq!(format_amount(999.999, "$"), "$1,000.00");
        assert_eq!(format_amount(1234567.891, "$"), "$1,234,567.89");
        assert_eq!(format_amount(-5.0, "€"), "-€5.00");
        assert_eq!(format_amount(100.0, ""), "100.00");
    }
}
