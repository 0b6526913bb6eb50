//! Common numeric helpers shared by the formula modules and the display.
//!
//! This module owns the display formatting contract: how a computed `f64`
//! becomes the string shown on the calculator's display line.

use rust_decimal::{Decimal, RoundingStrategy};

/// Display text for a failed or non-finite result.
pub const ERROR_DISPLAY: &str = "Error";

/// Display text for a result whose magnitude exceeds [`DISPLAY_LIMIT`].
pub const OVERFLOW_DISPLAY: &str = "Overflow";

/// Largest magnitude the display renders as a number.
pub const DISPLAY_LIMIT: f64 = 1e12;

/// Nonzero magnitudes below this render in exponential form.
pub const EXPONENTIAL_THRESHOLD: f64 = 1e-4;

/// Significant digits kept when rendering in fixed notation.
pub const SIGNIFICANT_DIGITS: u32 = 6;

/// Rounds a decimal value to `digits` significant digits using half-up rounding,
/// stripping trailing fractional zeros.
///
/// Returns `None` if the rounded value cannot be represented.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_significant;
///
/// assert_eq!(round_significant(dec!(88.848788), 6), Some(dec!(88.8488)));
/// assert_eq!(round_significant(dec!(123456789), 6), Some(dec!(123457000)));
/// assert_eq!(round_significant(dec!(2.50000), 6), Some(dec!(2.5)));
/// assert_eq!(round_significant(dec!(-0.0012345), 4), Some(dec!(-0.001235))); // Away from zero
/// ```
pub fn round_significant(
    value: Decimal,
    digits: u32,
) -> Option<Decimal> {
    value
        .round_sf_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .map(|rounded| rounded.normalize())
}

/// Formats a number for the calculator display.
///
/// | Input                        | Output                             |
/// |------------------------------|------------------------------------|
/// | NaN or infinite              | `Error`                            |
/// | magnitude above 1e12         | `Overflow`                         |
/// | zero                         | `0`                                |
/// | nonzero magnitude below 1e-4 | exponential, 4 fractional digits   |
/// | anything else                | 6 significant digits, no padding   |
///
/// # Examples
///
/// ```
/// use fincalc_core::calculations::common::format_number;
///
/// assert_eq!(format_number(88.84878867834166), "88.8488");
/// assert_eq!(format_number(180.0), "180");
/// assert_eq!(format_number(0.00001234), "1.2340e-5");
/// assert_eq!(format_number(2e12), "Overflow");
/// assert_eq!(format_number(f64::NAN), "Error");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return ERROR_DISPLAY.to_string();
    }

    let magnitude = value.abs();
    if magnitude > DISPLAY_LIMIT {
        return OVERFLOW_DISPLAY.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if magnitude < EXPONENTIAL_THRESHOLD {
        return format!("{value:.4e}");
    }

    // f64's Display is the shortest round-trip form and never uses an
    // exponent, so it always parses as a Decimal in this range.
    value
        .to_string()
        .parse::<Decimal>()
        .ok()
        .and_then(|decimal| round_significant(decimal, SIGNIFICANT_DIGITS))
        .map(|rounded| rounded.to_string())
        .unwrap_or_else(|| ERROR_DISPLAY.to_string())
}

/// Returns `Some(value)` when it is a finite number.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_significant tests
    // =========================================================================

    #[test]
    fn round_significant_rounds_up_at_midpoint() {
        let result = round_significant(dec!(1.234565), 6);

        assert_eq!(result, Some(dec!(1.23457)));
    }

    #[test]
    fn round_significant_handles_negative_values() {
        let result = round_significant(dec!(-1.234565), 6);

        assert_eq!(result, Some(dec!(-1.23457))); // Away from zero
    }

    #[test]
    fn round_significant_preserves_short_values() {
        let result = round_significant(dec!(25), 6);

        assert_eq!(result, Some(dec!(25)));
    }

    #[test]
    fn round_significant_carries_into_new_digit() {
        let result = round_significant(dec!(999999.5), 6);

        assert_eq!(result, Some(dec!(1000000)));
    }

    // =========================================================================
    // format_number tests
    // =========================================================================

    #[test]
    fn format_number_renders_whole_numbers_without_decimal_point() {
        assert_eq!(format_number(180.0), "180");
        assert_eq!(format_number(-42.0), "-42");
    }

    #[test]
    fn format_number_keeps_six_significant_digits() {
        assert_eq!(format_number(88.84878867834166), "88.8488");
        assert_eq!(format_number(123456789.0), "123457000");
        assert_eq!(format_number(0.000123456789), "0.000123457");
    }

    #[test]
    fn format_number_strips_binary_noise() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn format_number_rounds_shortest_decimal_half_away_from_zero() {
        // 1.0000005 is stored just below the midpoint but prints as 1.0000005.
        assert_eq!(format_number(1.0000005), "1.00001");
        assert_eq!(format_number(-1.0000005), "-1.00001");
    }

    #[test]
    fn format_number_renders_zero_without_sign() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn format_number_uses_exponent_below_threshold() {
        assert_eq!(format_number(0.00001234), "1.2340e-5");
        assert_eq!(format_number(-0.00005), "-5.0000e-5");
    }

    #[test]
    fn format_number_accepts_display_limit_itself() {
        assert_eq!(format_number(1e12), "1000000000000");
    }

    #[test]
    fn format_number_reports_overflow_above_limit() {
        assert_eq!(format_number(1.5e12), OVERFLOW_DISPLAY);
        assert_eq!(format_number(-1e13), OVERFLOW_DISPLAY);
    }

    #[test]
    fn format_number_reports_error_for_non_finite_values() {
        assert_eq!(format_number(f64::NAN), ERROR_DISPLAY);
        assert_eq!(format_number(f64::INFINITY), ERROR_DISPLAY);
        assert_eq!(format_number(f64::NEG_INFINITY), ERROR_DISPLAY);
    }

    #[test]
    fn finite_filters_nan_and_infinity() {
        assert_eq!(finite(1.5), Some(1.5));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
    }

    proptest! {
        #[test]
        fn prop_format_number_is_idempotent_in_fixed_range(
            mantissa in 1.0f64..10.0,
            exponent in -3i32..12,
            negative in proptest::bool::ANY,
        ) {
            let sign = if negative { -1.0 } else { 1.0 };
            let value = sign * mantissa * 10f64.powi(exponent);

            let once = format_number(value);
            let reparsed: f64 = once.parse().unwrap();

            prop_assert_eq!(format_number(reparsed), once);
        }
    }
}
