//! Markup, margin, selling price and cost.
//!
//! Markup is expressed against cost, margin against price. Both are percents.

use thiserror::Error;

use crate::calculations::common::finite;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("markup is undefined for a zero cost")]
    ZeroCost,

    /// Margin on a zero price, or cost from a -100% markup.
    #[error("price term is zero")]
    ZeroPrice,

    #[error("pricing result is not a finite number")]
    NonFinite,
}

/// Markup on cost, in percent.
///
/// ```
/// use fincalc_core::calculations::pricing::markup;
///
/// assert_eq!(markup(80.0, 100.0), Ok(25.0));
/// ```
pub fn markup(
    cost: f64,
    price: f64,
) -> Result<f64, PricingError> {
    if cost == 0.0 {
        return Err(PricingError::ZeroCost);
    }

    finite((price - cost) / cost * 100.0).ok_or(PricingError::NonFinite)
}

/// Margin on price, in percent.
pub fn margin(
    cost: f64,
    price: f64,
) -> Result<f64, PricingError> {
    if price == 0.0 {
        return Err(PricingError::ZeroPrice);
    }

    finite((price - cost) / price * 100.0).ok_or(PricingError::NonFinite)
}

/// Selling price for `cost` marked up by `markup_percent`.
pub fn price_from_markup(
    cost: f64,
    markup_percent: f64,
) -> Result<f64, PricingError> {
    finite(cost * (1.0 + markup_percent / 100.0)).ok_or(PricingError::NonFinite)
}

/// Cost that yields `price` when marked up by `markup_percent`.
///
/// A -100% markup maps every cost to a zero price, so it has no inverse.
pub fn cost_from_markup(
    price: f64,
    markup_percent: f64,
) -> Result<f64, PricingError> {
    let factor = 1.0 + markup_percent / 100.0;
    if factor == 0.0 {
        return Err(PricingError::ZeroPrice);
    }

    finite(price / factor).ok_or(PricingError::NonFinite)
}
