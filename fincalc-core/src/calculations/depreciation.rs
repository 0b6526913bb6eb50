//! Depreciation for a single asset.
//!
//! Three methods over the same [`DepreciationParameters`]:
//!
//! - **Straight-line**: `(cost - salvage) / life` every year.
//! - **Declining-balance**: `cost × rate / 100`. Book value is never carried
//!   forward, so this is the first-period charge only.
//! - **Sum-of-years-digits**: `(cost - salvage) × (life - year + 1) / SYD`
//!   where `SYD = life × (life + 1) / 2`.

use thiserror::Error;

use crate::calculations::common::finite;
use crate::models::DepreciationParameters;

#[derive(Debug, Error, PartialEq)]
pub enum DepreciationError {
    #[error("useful life must be positive, got {0}")]
    NonPositiveLife(f64),

    /// Sum-of-years-digits year outside `[1, life]`.
    #[error("year {year} is outside 1..={life}")]
    YearOutOfRange { year: i64, life: f64 },

    #[error("depreciation result is not a finite number")]
    NonFinite,
}

/// Depreciation calculator.
///
/// # Example
///
/// ```
/// use fincalc_core::calculations::Depreciation;
/// use fincalc_core::DepreciationParameters;
///
/// let asset = DepreciationParameters::default(); // cost 1000, salvage 100, life 5
/// let depreciation = Depreciation::new(&asset);
///
/// assert_eq!(depreciation.straight_line(), Ok(180.0));
/// assert_eq!(depreciation.sum_of_years_digits(1), Ok(300.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Depreciation<'a> {
    asset: &'a DepreciationParameters,
}

impl<'a> Depreciation<'a> {
    pub fn new(asset: &'a DepreciationParameters) -> Self {
        Self { asset }
    }

    /// Annual straight-line charge.
    pub fn straight_line(&self) -> Result<f64, DepreciationError> {
        let life = self.life()?;

        finite((self.asset.cost - self.asset.salvage) / life).ok_or(DepreciationError::NonFinite)
    }

    /// First-period declining-balance charge at `rate` percent.
    pub fn declining_balance(
        &self,
        rate: f64,
    ) -> Result<f64, DepreciationError> {
        self.life()?;

        finite(self.asset.cost * rate / 100.0).ok_or(DepreciationError::NonFinite)
    }

    /// Sum-of-years-digits charge for the 1-based `year`.
    ///
    /// # Errors
    ///
    /// Returns [`DepreciationError::YearOutOfRange`] if `year` is below 1 or
    /// beyond the useful life.
    pub fn sum_of_years_digits(
        &self,
        year: i64,
    ) -> Result<f64, DepreciationError> {
        let life = self.life()?;
        if year < 1 || year as f64 > life {
            return Err(DepreciationError::YearOutOfRange { year, life });
        }

        let digits = life * (life + 1.0) / 2.0;
        let remaining = life - year as f64 + 1.0;

        finite((self.asset.cost - self.asset.salvage) * remaining / digits)
            .ok_or(DepreciationError::NonFinite)
    }

    fn life(&self) -> Result<f64, DepreciationError> {
        match self.asset.life {
            life if life > 0.0 => Ok(life),
            life => Err(DepreciationError::NonPositiveLife(life)),
        }
    }
}
