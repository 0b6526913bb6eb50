//! TOML configuration for the starting calculator state.
//!
//! ```toml
//! [registers]
//! n = 360
//! iyr = 6.5
//! pv = -250000
//! payments_per_year = 12
//! timing = "end"
//!
//! [bond]
//! settlement = "2024-01-01"
//! maturity = "2034-01-01"
//! coupon_rate = 5.0
//!
//! [depreciation]
//! cost = 12000
//! salvage = 2000
//! life = 8
//! ```
//!
//! Every table and key is optional.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fincalc_core::CalculatorConfig;

/// Parses and validates configuration text.
pub fn parse_config(text: &str) -> Result<CalculatorConfig> {
    let config: CalculatorConfig = toml::from_str(text).context("malformed configuration")?;
    config
        .validate()
        .context("configuration failed validation")?;
    Ok(config)
}

/// Reads, parses and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<CalculatorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file '{}'", path.display()))?;
    parse_config(&text).with_context(|| format!("in config file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fincalc_core::{DepreciationMethod, PaymentTiming};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_text_yields_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.registers, CalculatorConfig::default().registers);
        assert_eq!(config.depreciation, CalculatorConfig::default().depreciation);
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_config(
            r#"
            [registers]
            n = 36
            payments_per_year = 4
            timing = "begin"

            [bond]
            settlement = "2024-03-15"
            maturity = "2029-03-15"
            yield = 4.5

            [depreciation]
            life = 8
            method = "sum_of_years_digits"
            "#,
        )
        .unwrap();

        assert_eq!(config.registers.n, 36.0);
        assert_eq!(config.registers.payments_per_year, 4);
        assert_eq!(config.registers.timing, PaymentTiming::Begin);
        assert_eq!(
            config.bond.settlement,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(config.bond.yield_rate, 4.5);
        assert_eq!(config.bond.face_value, 1000.0);
        assert_eq!(config.depreciation.life, 8.0);
        assert_eq!(
            config.depreciation.method,
            DepreciationMethod::SumOfYearsDigits
        );
    }

    #[test]
    fn invalid_values_fail_validation() {
        let error = parse_config("[registers]\npayments_per_year = 0\n").unwrap_err();

        assert_eq!(error.to_string(), "configuration failed validation");
        assert!(format!("{error:#}").contains("payments per year must be positive"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let error = parse_config("[registers\n").unwrap_err();

        assert_eq!(error.to_string(), "malformed configuration");
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load_config(Path::new("/nonexistent/fincalc.toml")).unwrap_err();

        assert!(error.to_string().contains("/nonexistent/fincalc.toml"));
    }
}
