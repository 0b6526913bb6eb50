//! Single-period amortization split.
//!
//! Every figure is recomputed from the TVM registers; no running balance is
//! carried between periods.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::finite;
use crate::models::TvmRegisters;

#[derive(Debug, Error, PartialEq)]
pub enum AmortizationError {
    /// The period lies outside `[1, N]`.
    #[error("period {period} is outside 1..={periods}")]
    PeriodOutOfRange { period: i64, periods: f64 },

    #[error("amortization result is not a finite number")]
    NonFinite,
}

/// How one period's payment splits between interest and principal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: i64,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

/// Splits the payment for the 1-based `period` of the loan described by `registers`.
///
/// # Errors
///
/// Returns [`AmortizationError::PeriodOutOfRange`] when `period` is below 1 or
/// above `N`, and [`AmortizationError::NonFinite`] if any figure overflows.
pub fn amortize(
    registers: &TvmRegisters,
    period: i64,
) -> Result<AmortizationRow, AmortizationError> {
    let periods = registers.n;
    if period < 1 || period as f64 > periods {
        return Err(AmortizationError::PeriodOutOfRange { period, periods });
    }

    let rate = registers.periodic_rate();
    let balance = remaining_balance(registers, period as f64 - 1.0);

    let interest = if period == 1 {
        registers.pv * rate
    } else {
        remaining_balance(registers, period as f64 - 2.0) * rate
    };
    let principal = registers.pmt - interest;

    if [balance, interest, principal].iter().any(|v| finite(*v).is_none()) {
        return Err(AmortizationError::NonFinite);
    }

    Ok(AmortizationRow {
        period,
        payment: registers.pmt,
        principal,
        interest,
        balance,
    })
}

/// Balance outstanding once `elapsed` periods have passed.
fn remaining_balance(
    registers: &TvmRegisters,
    elapsed: f64,
) -> f64 {
    let TvmRegisters { n, pv, pmt, fv, .. } = *registers;
    let rate = registers.periodic_rate();

    if rate == 0.0 {
        return pv * (1.0 - elapsed / n);
    }

    let remaining = n - elapsed;
    let growth = (1.0 + rate).powf(remaining);
    -(pmt * (growth - 1.0) / (rate * growth) + fv / growth)
}
