use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days per year used when converting the settlement-to-maturity span.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Inputs to bond price and yield calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondParameters {
    pub settlement: NaiveDate,
    pub maturity: NaiveDate,
    /// Annual coupon rate, in percent.
    pub coupon_rate: f64,
    /// Annual yield to maturity, in percent.
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    pub face_value: f64,
    /// Coupon payments per year.
    pub frequency: u32,
}

impl BondParameters {
    /// Highest coupon frequency accepted: one coupon a day.
    pub const MAX_FREQUENCY: u32 = 365;

    /// A ten-year, 5% semi-annual bond priced at par, settling on `settlement`.
    pub fn starting(settlement: NaiveDate) -> Self {
        Self {
            settlement,
            maturity: settlement + Months::new(120),
            coupon_rate: 5.0,
            yield_rate: 5.0,
            face_value: 1000.0,
            frequency: 2,
        }
    }

    /// Whether `frequency` lies in `1..=MAX_FREQUENCY`.
    pub fn has_valid_frequency(&self) -> bool {
        (1..=Self::MAX_FREQUENCY).contains(&self.frequency)
    }

    /// Settlement-to-maturity span measured in 365-day years.
    pub fn years_to_maturity(&self) -> f64 {
        self.maturity
            .signed_duration_since(self.settlement)
            .num_days() as f64
            / DAYS_PER_YEAR
    }
}

impl Default for BondParameters {
    fn default() -> Self {
        Self::starting(Local::now().date_naive())
    }
}
