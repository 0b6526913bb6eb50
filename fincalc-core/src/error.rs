use thiserror::Error;

use crate::calculations::{
    AmortizationError, BondError, DepreciationError, PricingError, StatisticsError, TvmError,
};

/// Any failure raised while the calculator handles a key.
///
/// None of these is fatal: the engine logs the error and shows the Error
/// display, and the next digit starts a fresh entry.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    /// The edit buffer does not hold a number.
    #[error("invalid entry: {0:?}")]
    InvalidEntry(String),

    #[error("TVM error: {0}")]
    Tvm(#[from] TvmError),

    #[error("Amortization error: {0}")]
    Amortization(#[from] AmortizationError),

    #[error("Bond error: {0}")]
    Bond(#[from] BondError),

    #[error("Depreciation error: {0}")]
    Depreciation(#[from] DepreciationError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Statistics error: {0}")]
    Statistics(#[from] StatisticsError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formula_errors_convert_with_question_mark() {
        fn solve() -> Result<f64, CalcError> {
            Err(TvmError::ZeroPeriods)?
        }

        assert_eq!(solve(), Err(CalcError::Tvm(TvmError::ZeroPeriods)));
    }

    #[test]
    fn display_includes_source_message() {
        let error = CalcError::from(StatisticsError::InsufficientData {
            required: 2,
            available: 1,
        });

        assert_eq!(
            error.to_string(),
            "Statistics error: need at least 2 data points, have 1"
        );
    }
}
