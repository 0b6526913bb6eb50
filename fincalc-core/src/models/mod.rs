mod bond_parameters;
mod calculator_config;
mod depreciation_parameters;
mod tvm_registers;

pub use bond_parameters::{BondParameters, DAYS_PER_YEAR};
pub use calculator_config::{CalculatorConfig, ConfigError};
pub use depreciation_parameters::{DepreciationMethod, DepreciationParameters};
pub use tvm_registers::{PaymentTiming, Register, TvmRegisters};
