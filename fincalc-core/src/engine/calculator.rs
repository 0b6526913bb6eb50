//! The calculator's input state machine.
//!
//! A [`Calculator`] owns every register. Keys go in through
//! [`Calculator::press`]; the face is read back with [`Calculator::render`].
//! A failed computation never escapes `press`: it is logged and the display
//! shows `Error` until the next entry.

use tracing::{debug, warn};

use crate::calculations::common::ERROR_DISPLAY;
use crate::calculations::{
    BondCalculator, Depreciation, StatisticsAccumulator, TvmSolver, amortize, format_number,
    pricing,
};
use crate::engine::dispatch::{self, Action, Mode, Operator};
use crate::engine::display::DisplayState;
use crate::engine::key::Key;
use crate::error::CalcError;
use crate::models::{
    BondParameters, CalculatorConfig, ConfigError, DepreciationMethod, DepreciationParameters,
    Register, TvmRegisters,
};

/// Longest entry the buffer accepts.
const MAX_ENTRY_LEN: usize = 12;

/// Left operand and operator waiting for `equals`.
#[derive(Debug, Clone, PartialEq)]
struct PendingOperation {
    operator: Operator,
    left: String,
}

/// Financial calculator session.
///
/// # Example
///
/// ```
/// use fincalc_core::{Calculator, Key};
///
/// let mut calc = Calculator::new();
/// for token in ["1", "2", "n", "1", "2", "iyr"] {
///     calc.press(Key::parse(token).unwrap());
/// }
/// calc.registers_mut().pv = -1000.0;
///
/// // The first press recalls PMT; pressing it again on that entry solves it.
/// calc.press(Key::Pmt);
/// calc.press(Key::Pmt);
///
/// assert_eq!(calc.render().display, "88.8488");
/// assert_eq!(calc.registers().n, 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct Calculator {
    buffer: String,
    new_number: bool,
    secondary: bool,
    tertiary: bool,
    memory: f64,
    pending: Option<PendingOperation>,
    help_requested: bool,
    registers: TvmRegisters,
    bond: BondParameters,
    depreciation: DepreciationParameters,
    statistics: StatisticsAccumulator,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::from_parts(CalculatorConfig::default())
    }
}

impl Calculator {
    /// A calculator with power-on defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A calculator whose registers start from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn with_config(config: CalculatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: CalculatorConfig) -> Self {
        Self {
            buffer: "0".to_string(),
            new_number: true,
            secondary: false,
            tertiary: false,
            memory: 0.0,
            pending: None,
            help_requested: false,
            registers: config.registers,
            bond: config.bond,
            depreciation: config.depreciation,
            statistics: StatisticsAccumulator::default(),
        }
    }

    /// Handles one key press.
    pub fn press(
        &mut self,
        key: Key,
    ) {
        self.help_requested = false;
        let mode = self.mode();

        let Some(action) = dispatch::lookup(mode, key) else {
            debug!(%key, ?mode, "key has no action");
            self.clear_modifiers();
            return;
        };
        debug!(%key, ?mode, ?action, "dispatching key");

        if action.is_modifier() {
            self.toggle_modifier(action);
            return;
        }

        if let Err(error) = self.execute(action) {
            warn!(%key, %error, "calculation failed");
            self.buffer = ERROR_DISPLAY.to_string();
            self.new_number = true;
        }
        self.clear_modifiers();
    }

    /// Presses each key in order.
    pub fn press_all(
        &mut self,
        keys: impl IntoIterator<Item = Key>,
    ) {
        for key in keys {
            self.press(key);
        }
    }

    /// Snapshot of the calculator face.
    pub fn render(&self) -> DisplayState {
        let mut indicator = String::new();
        if self.secondary {
            indicator.push('O');
        }
        if self.tertiary {
            indicator.push('B');
        }

        DisplayState {
            display: self.buffer.clone(),
            n: format_number(self.registers.n),
            iyr: format_number(self.registers.iyr),
            pv: format_number(self.registers.pv),
            pmt: format_number(self.registers.pmt),
            fv: format_number(self.registers.fv),
            indicator,
            help_requested: self.help_requested,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.secondary {
            Mode::Secondary
        } else if self.tertiary {
            Mode::Tertiary
        } else {
            Mode::Base
        }
    }

    pub fn display(&self) -> &str {
        &self.buffer
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn registers(&self) -> &TvmRegisters {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut TvmRegisters {
        &mut self.registers
    }

    pub fn bond(&self) -> &BondParameters {
        &self.bond
    }

    pub fn bond_mut(&mut self) -> &mut BondParameters {
        &mut self.bond
    }

    pub fn depreciation(&self) -> &DepreciationParameters {
        &self.depreciation
    }

    pub fn depreciation_mut(&mut self) -> &mut DepreciationParameters {
        &mut self.depreciation
    }

    pub fn statistics(&self) -> &StatisticsAccumulator {
        &self.statistics
    }

    fn toggle_modifier(
        &mut self,
        action: Action,
    ) {
        if action == Action::ToggleSecondary {
            self.secondary = !self.secondary;
            self.tertiary = false;
        } else {
            self.tertiary = !self.tertiary;
            self.secondary = false;
        }
        debug!(secondary = self.secondary, tertiary = self.tertiary, "modifier toggled");
    }

    fn clear_modifiers(&mut self) {
        self.secondary = false;
        self.tertiary = false;
    }

    fn execute(
        &mut self,
        action: Action,
    ) -> Result<(), CalcError> {
        match action {
            Action::Digit(digit) => self.append_digit(digit),
            Action::Decimal => self.append_decimal(),
            Action::Arm(operator) => {
                self.pending = Some(PendingOperation {
                    operator,
                    left: self.buffer.clone(),
                });
                self.new_number = true;
            }
            Action::Evaluate => {
                let Some(pending) = self.pending.take() else {
                    return Ok(());
                };
                let left = parse_entry(&pending.left)?;
                let result = pending.operator.apply(left, self.entry()?)?;
                self.show(result);
            }
            Action::ClearEntry => self.reset_entry(),
            Action::StoreOrRecall(register) => {
                if self.new_number {
                    self.recall_register(register);
                } else {
                    self.store_register(register)?;
                }
            }
            Action::RecallOrSolve(register) => {
                if self.new_number {
                    self.recall_register(register);
                } else {
                    self.solve(register)?;
                }
            }
            Action::Solve(register) => self.solve(register)?,
            Action::StoreMemory => {
                self.memory = self.entry()?;
                self.new_number = true;
                debug!(memory = self.memory, "memory stored");
            }
            Action::RecallMemory => self.show(self.memory),
            Action::ToggleSign => self.toggle_sign(),
            Action::Help => self.help_requested = true,

            Action::AddDatum => {
                let x = self.entry()?;
                let count = self.statistics.add(x, self.memory);
                self.show(count as f64);
            }
            Action::MeanX => self.show(self.statistics.mean_x()?),
            Action::MeanY => self.show(self.statistics.mean_y()?),
            Action::StdDevX => self.show(self.statistics.std_dev_x()?),
            Action::VarianceX => self.show(self.statistics.variance_x()?),
            Action::Slope => {
                let line = self.statistics.regression()?;
                self.show(line.slope);
            }
            Action::Correlation => self.show(self.statistics.correlation()?),
            Action::ForecastY => {
                let y = self.statistics.forecast_y(self.entry()?)?;
                self.show(y);
            }
            Action::ForecastX => {
                let x = self.statistics.forecast_x(self.entry()?)?;
                self.show(x);
            }
            Action::ClearStatistics => {
                self.statistics.clear();
                self.reset_entry();
            }

            Action::Markup => self.show(pricing::markup(self.entry()?, self.memory)?),
            Action::Margin => self.show(pricing::margin(self.entry()?, self.memory)?),
            Action::Price => self.show(pricing::price_from_markup(self.entry()?, self.memory)?),
            Action::Cost => self.show(pricing::cost_from_markup(self.entry()?, self.memory)?),

            Action::StraightLine => {
                self.depreciation.cost = self.entry()?;
                self.select_method(DepreciationMethod::StraightLine);
                self.show(Depreciation::new(&self.depreciation).straight_line()?);
            }
            Action::DecliningBalance => {
                let rate = self.entry()?;
                self.select_method(DepreciationMethod::DecliningBalance);
                self.show(Depreciation::new(&self.depreciation).declining_balance(rate)?);
            }
            Action::SumOfYearsDigits => {
                let year = self.entry()?.trunc() as i64;
                self.select_method(DepreciationMethod::SumOfYearsDigits);
                self.show(Depreciation::new(&self.depreciation).sum_of_years_digits(year)?);
            }

            Action::AmortizePrincipal => {
                let period = self.entry()?.trunc() as i64;
                let row = amortize(&self.registers, period)?;
                debug!(?row, "amortization row");
                self.show(row.principal);
            }
            Action::BondPrice => {
                let yield_percent = self.entry()?;
                self.bond.yield_rate = yield_percent;
                self.show(BondCalculator::new(&self.bond).price(yield_percent)?);
            }
            Action::BondYield => {
                let price = self.entry()?;
                self.show(BondCalculator::new(&self.bond).yield_to_maturity(price)?);
            }

            Action::ToggleSecondary | Action::ToggleTertiary => self.toggle_modifier(action),
        }
        Ok(())
    }

    fn select_method(
        &mut self,
        method: DepreciationMethod,
    ) {
        self.depreciation.method = method;
        debug!(method = method.as_str(), "depreciation method selected");
    }

    /// The edit buffer as a number.
    fn entry(&self) -> Result<f64, CalcError> {
        parse_entry(&self.buffer)
    }

    /// Shows a computed result and starts a new number.
    fn show(
        &mut self,
        value: f64,
    ) {
        self.buffer = format_number(value);
        self.new_number = true;
    }

    fn reset_entry(&mut self) {
        self.buffer = "0".to_string();
        self.new_number = true;
    }

    fn append_digit(
        &mut self,
        digit: u8,
    ) {
        let digit = char::from(b'0' + digit);
        if self.new_number {
            self.buffer = digit.to_string();
            self.new_number = false;
        } else if self.buffer.len() < MAX_ENTRY_LEN {
            if self.buffer == "0" {
                self.buffer.clear();
            }
            self.buffer.push(digit);
        }
    }

    fn append_decimal(&mut self) {
        if self.new_number {
            self.buffer = "0.".to_string();
            self.new_number = false;
        } else if !self.buffer.contains('.') && self.buffer.len() < MAX_ENTRY_LEN {
            self.buffer.push('.');
        }
    }

    fn toggle_sign(&mut self) {
        if self.buffer == "0" || self.buffer == ERROR_DISPLAY {
            return;
        }
        match self.buffer.strip_prefix('-') {
            Some(positive) => self.buffer = positive.to_string(),
            None => self.buffer.insert(0, '-'),
        }
    }

    /// Shows the raw register value as an editable entry.
    fn recall_register(
        &mut self,
        register: Register,
    ) {
        self.buffer = self.registers.get(register).to_string();
        self.new_number = false;
    }

    fn store_register(
        &mut self,
        register: Register,
    ) -> Result<(), CalcError> {
        let value = self.entry()?;
        self.registers.set(register, value);
        self.new_number = true;
        debug!(register = register.label(), value, "register stored");
        Ok(())
    }

    fn solve(
        &mut self,
        register: Register,
    ) -> Result<(), CalcError> {
        let value = TvmSolver::new(&self.registers).solve(register)?;
        self.registers.set(register, value);
        self.show(value);
        Ok(())
    }
}

fn parse_entry(text: &str) -> Result<f64, CalcError> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CalcError::InvalidEntry(text.to_string()))
}
