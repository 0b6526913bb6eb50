//! Financial formula modules.
//!
//! Each module is a pure function of its inputs: nothing here touches the
//! calculator's edit buffer or modifier state. Failures come back as the
//! module's own error type and are folded into [`crate::CalcError`] by the
//! engine.

pub mod amortization;
pub mod bond;
pub mod common;
pub mod depreciation;
pub mod pricing;
pub mod statistics;
pub mod tvm;

pub use amortization::{AmortizationError, AmortizationRow, amortize};
pub use bond::{BondCalculator, BondError};
pub use common::format_number;
pub use depreciation::{Depreciation, DepreciationError};
pub use pricing::PricingError;
pub use statistics::{RegressionLine, StatisticsAccumulator, StatisticsError};
pub use tvm::{TvmError, TvmSolver};
