use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BondParameters, DepreciationParameters, TvmRegisters};

/// Errors raised when a [`CalculatorConfig`] holds values no calculation can use.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Payments per year must be at least one.
    #[error("payments per year must be positive, got {0}")]
    InvalidPaymentsPerYear(u32),

    /// Bond coupon frequency must be between one and a coupon a day.
    #[error("bond coupon frequency must be between 1 and 365, got {0}")]
    InvalidBondFrequency(u32),

    /// Bond maturity must fall after settlement.
    #[error("bond maturity {maturity} is not after settlement {settlement}")]
    MaturityNotAfterSettlement {
        settlement: chrono::NaiveDate,
        maturity: chrono::NaiveDate,
    },

    /// Useful life must be positive.
    #[error("depreciation life must be positive, got {0}")]
    NonPositiveLife(f64),
}

/// Starting state for a calculator session.
///
/// Every section is optional when deserialized; missing sections take the
/// handheld calculator's power-on values.
///
/// # Example
///
/// ```
/// use fincalc_core::{CalculatorConfig, PaymentTiming};
///
/// let mut config = CalculatorConfig::default();
/// config.registers.payments_per_year = 4;
/// config.registers.timing = PaymentTiming::Begin;
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub registers: TvmRegisters,
    pub bond: BondParameters,
    pub depreciation: DepreciationParameters,
}

impl CalculatorConfig {
    /// Checks that every section is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `registers.payments_per_year` is zero
    /// - `bond.frequency` is zero or above [`BondParameters::MAX_FREQUENCY`]
    /// - `bond.maturity` is on or before `bond.settlement`
    /// - `depreciation.life` is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registers.payments_per_year == 0 {
            return Err(ConfigError::InvalidPaymentsPerYear(
                self.registers.payments_per_year,
            ));
        }
        if !self.bond.has_valid_frequency() {
            return Err(ConfigError::InvalidBondFrequency(self.bond.frequency));
        }
        if self.bond.maturity <= self.bond.settlement {
            return Err(ConfigError::MaturityNotAfterSettlement {
                settlement: self.bond.settlement,
                maturity: self.bond.maturity,
            });
        }
        if self.depreciation.life <= 0.0 {
            return Err(ConfigError::NonPositiveLife(self.depreciation.life));
        }
        Ok(())
    }
}
