//! Bond price and yield to maturity.
//!
//! Prices are a discrete-coupon present value: `T = round(years × frequency)`
//! coupons of `face × coupon_rate / frequency`, plus the face value at
//! maturity, all discounted at the per-period yield.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use fincalc_core::calculations::BondCalculator;
//! use fincalc_core::BondParameters;
//!
//! let settlement = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let bond = BondParameters::starting(settlement);
//! let calculator = BondCalculator::new(&bond);
//!
//! // A 5% coupon priced at a 5% yield trades at par.
//! let price = calculator.price(5.0).unwrap();
//! assert!((price - 1000.0).abs() < 1e-6);
//!
//! let yield_percent = calculator.yield_to_maturity(price).unwrap();
//! assert!((yield_percent - 5.0).abs() < 1e-6);
//! ```

use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::finite;
use crate::models::BondParameters;

/// Iteration cap for the yield search.
const YIELD_MAX_ITERATIONS: u32 = 100;

/// Successive yields closer than this are considered converged.
const YIELD_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BondError {
    /// Settlement falls on or after maturity.
    #[error("maturity must be after settlement")]
    MaturityNotAfterSettlement,

    /// A yield can only be implied from a positive price.
    #[error("bond price must be positive")]
    NonPositivePrice,

    /// Coupon frequency outside `1..=BondParameters::MAX_FREQUENCY`.
    #[error("coupon frequency must be between 1 and 365, got {0}")]
    InvalidFrequency(u32),

    #[error("bond result is not a finite number")]
    NonFinite,
}

/// Coupon count and per-period coupon for a bond.
#[derive(Debug, Clone, Copy)]
struct CouponSchedule {
    periods: i32,
    coupon: f64,
}

/// Price/yield calculator over one set of bond parameters.
#[derive(Debug, Clone, Copy)]
pub struct BondCalculator<'a> {
    bond: &'a BondParameters,
}

impl<'a> BondCalculator<'a> {
    pub fn new(bond: &'a BondParameters) -> Self {
        Self { bond }
    }

    /// Price per `face_value` at an annual yield of `yield_percent`.
    ///
    /// # Errors
    ///
    /// [`BondError::MaturityNotAfterSettlement`] when the bond has no time
    /// left to run, [`BondError::InvalidFrequency`] for a coupon frequency
    /// outside `1..=365`, and [`BondError::NonFinite`] if the price overflows.
    pub fn price(
        &self,
        yield_percent: f64,
    ) -> Result<f64, BondError> {
        let schedule = self.schedule()?;
        let per_period = yield_percent / 100.0 / f64::from(self.bond.frequency);

        finite(self.present_value(schedule, per_period)).ok_or(BondError::NonFinite)
    }

    /// Annual yield to maturity, in percent, implied by `price`.
    ///
    /// Newton-Raphson on the price function, seeded at the per-period coupon
    /// rate. When the iteration cap is reached the last iterate is returned.
    pub fn yield_to_maturity(
        &self,
        price: f64,
    ) -> Result<f64, BondError> {
        self.search_yield(price, YIELD_MAX_ITERATIONS)
    }

    fn search_yield(
        &self,
        price: f64,
        max_iterations: u32,
    ) -> Result<f64, BondError> {
        if price <= 0.0 {
            return Err(BondError::NonPositivePrice);
        }

        let schedule = self.schedule()?;
        let frequency = f64::from(self.bond.frequency);
        let mut per_period = self.bond.coupon_rate / 100.0 / frequency;
        let mut converged = false;

        for iteration in 0..max_iterations {
            let error = self.present_value(schedule, per_period) - price;
            let next = per_period - error / self.present_value_slope(schedule, per_period);

            if !next.is_finite() {
                return Err(BondError::NonFinite);
            }

            let step = (next - per_period).abs();
            per_period = next;
            if step < YIELD_TOLERANCE {
                debug!(iteration, per_period, "bond yield converged");
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                iterations = max_iterations,
                per_period, "bond yield hit the iteration cap; returning last estimate"
            );
        }

        finite(per_period * frequency * 100.0).ok_or(BondError::NonFinite)
    }

    fn schedule(&self) -> Result<CouponSchedule, BondError> {
        if !self.bond.has_valid_frequency() {
            return Err(BondError::InvalidFrequency(self.bond.frequency));
        }

        let years = self.bond.years_to_maturity();
        if years <= 0.0 {
            return Err(BondError::MaturityNotAfterSettlement);
        }

        let frequency = f64::from(self.bond.frequency);
        Ok(CouponSchedule {
            periods: (years * frequency).round() as i32,
            coupon: self.bond.face_value * self.bond.coupon_rate / 100.0 / frequency,
        })
    }

    fn present_value(
        &self,
        schedule: CouponSchedule,
        per_period: f64,
    ) -> f64 {
        let discount = 1.0 + per_period;
        let coupons: f64 = (1..=schedule.periods)
            .map(|i| schedule.coupon / discount.powi(i))
            .sum();

        coupons + self.bond.face_value / discount.powi(schedule.periods)
    }

    /// Derivative of [`Self::present_value`] with respect to the per-period yield.
    fn present_value_slope(
        &self,
        schedule: CouponSchedule,
        per_period: f64,
    ) -> f64 {
        let discount = 1.0 + per_period;
        let coupons: f64 = (1..=schedule.periods)
            .map(|i| -f64::from(i) * schedule.coupon / discount.powi(i + 1))
            .sum();

        coupons
            - f64::from(schedule.periods) * self.bond.face_value
                / discount.powi(schedule.periods + 1)
    }
}
