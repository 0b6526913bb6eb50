//! Two-variable statistics and least-squares regression.
//!
//! The accumulator keeps running sums for the regression and correlation
//! formulas and the raw pairs for the spread measures, which are computed with
//! a second pass over deviations from the mean.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::finite;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("need at least {required} data points, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// Every x is the same, so the slope is undefined.
    #[error("all x values are equal; regression line is vertical")]
    VerticalLine,

    #[error("correlation is undefined when x or y has zero variance")]
    ZeroVariance,

    #[error("correlation fell outside [-1, 1]")]
    CorrelationOutOfRange,

    /// A zero slope has no inverse for forecasting x.
    #[error("regression line is horizontal; x cannot be forecast")]
    HorizontalLine,

    #[error("statistics result is not a finite number")]
    NonFinite,
}

/// Least-squares line `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
}

/// Running sums over the (x, y) pairs entered so far.
///
/// # Example
///
/// ```
/// use fincalc_core::calculations::StatisticsAccumulator;
///
/// let mut stats = StatisticsAccumulator::default();
/// stats.add(1.0, 2.0);
/// stats.add(2.0, 4.0);
/// stats.add(3.0, 6.0);
///
/// let line = stats.regression().unwrap();
/// assert_eq!(line.slope, 2.0);
/// assert_eq!(stats.forecast_y(10.0), Ok(20.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsAccumulator {
    sum_x: f64,
    sum_y: f64,
    sum_xy: f64,
    sum_x2: f64,
    sum_y2: f64,
    points: Vec<(f64, f64)>,
    line: Option<RegressionLine>,
}

impl StatisticsAccumulator {
    /// Adds one pair and returns the new count.
    pub fn add(
        &mut self,
        x: f64,
        y: f64,
    ) -> usize {
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xy += x * y;
        self.sum_x2 += x * x;
        self.sum_y2 += y * y;
        self.points.push((x, y));
        self.line = None;

        debug!(x, y, count = self.points.len(), "statistics datum added");
        self.points.len()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn mean_x(&self) -> Result<f64, StatisticsError> {
        self.require(1)?;
        Ok(self.sum_x / self.n())
    }

    pub fn mean_y(&self) -> Result<f64, StatisticsError> {
        self.require(1)?;
        Ok(self.sum_y / self.n())
    }

    /// Sample variance of x (n - 1 denominator).
    pub fn variance_x(&self) -> Result<f64, StatisticsError> {
        self.require(2)?;

        let mean = self.sum_x / self.n();
        let squared_deviations: f64 = self
            .points
            .iter()
            .map(|(x, _)| (x - mean) * (x - mean))
            .sum();

        finite(squared_deviations / (self.n() - 1.0)).ok_or(StatisticsError::NonFinite)
    }

    /// Sample standard deviation of x.
    pub fn std_dev_x(&self) -> Result<f64, StatisticsError> {
        self.variance_x().map(f64::sqrt)
    }

    /// Least-squares line through the points, cached until the next [`add`](Self::add).
    pub fn regression(&mut self) -> Result<RegressionLine, StatisticsError> {
        if let Some(line) = self.line {
            return Ok(line);
        }

        self.require(2)?;
        let n = self.n();
        let denominator = n * self.sum_x2 - self.sum_x * self.sum_x;
        if denominator == 0.0 {
            return Err(StatisticsError::VerticalLine);
        }

        let slope = (n * self.sum_xy - self.sum_x * self.sum_y) / denominator;
        let intercept = (self.sum_y - slope * self.sum_x) / n;
        if finite(slope).is_none() || finite(intercept).is_none() {
            return Err(StatisticsError::NonFinite);
        }

        let line = RegressionLine { slope, intercept };
        debug!(slope, intercept, "regression line cached");
        self.line = Some(line);
        Ok(line)
    }

    /// Pearson correlation coefficient.
    pub fn correlation(&self) -> Result<f64, StatisticsError> {
        self.require(2)?;
        let n = self.n();

        let numerator = n * self.sum_xy - self.sum_x * self.sum_y;
        let spread_x = n * self.sum_x2 - self.sum_x * self.sum_x;
        let spread_y = n * self.sum_y2 - self.sum_y * self.sum_y;
        let denominator = (spread_x * spread_y).sqrt();
        if denominator == 0.0 || denominator.is_nan() {
            return Err(StatisticsError::ZeroVariance);
        }

        let r = finite(numerator / denominator).ok_or(StatisticsError::NonFinite)?;
        if !(-1.0..=1.0).contains(&r) {
            return Err(StatisticsError::CorrelationOutOfRange);
        }
        Ok(r)
    }

    /// Predicted y for `x` on the regression line.
    pub fn forecast_y(
        &mut self,
        x: f64,
    ) -> Result<f64, StatisticsError> {
        let line = self.regression()?;

        finite(line.slope * x + line.intercept).ok_or(StatisticsError::NonFinite)
    }

    /// Predicted x for `y` on the regression line.
    pub fn forecast_x(
        &mut self,
        y: f64,
    ) -> Result<f64, StatisticsError> {
        let line = self.regression()?;
        if line.slope == 0.0 {
            return Err(StatisticsError::HorizontalLine);
        }

        finite((y - line.intercept) / line.slope).ok_or(StatisticsError::NonFinite)
    }

    fn n(&self) -> f64 {
        self.points.len() as f64
    }

    fn require(
        &self,
        required: usize,
    ) -> Result<(), StatisticsError> {
        let available = self.points.len();
        if available < required {
            return Err(StatisticsError::InsufficientData {
                required,
                available,
            });
        }
        Ok(())
    }
}
