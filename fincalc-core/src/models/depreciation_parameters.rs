use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    #[default]
    StraightLine,
    DecliningBalance,
    SumOfYearsDigits,
}

impl DepreciationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StraightLine => "SL",
            Self::DecliningBalance => "DB",
            Self::SumOfYearsDigits => "SOYD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepreciationParameters {
    pub cost: f64,
    pub salvage: f64,
    /// Useful life in periods.
    pub life: f64,
    /// Method used by the most recent depreciation calculation.
    pub method: DepreciationMethod,
}

impl Default for DepreciationParameters {
    fn default() -> Self {
        Self {
            cost: 1000.0,
            salvage: 100.0,
            life: 5.0,
            method: DepreciationMethod::StraightLine,
        }
    }
}
