//! Key-to-action tables for the three keyboard modes.
//!
//! Lookup chain: the active shifted table first, then the base table.

use serde::{Deserialize, Serialize};

use crate::engine::key::Key;
use crate::error::CalcError;
use crate::models::Register;

/// Which action table the next key is looked up in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Base,
    /// After `orange`.
    Secondary,
    /// After `blue`.
    Tertiary,
}

/// A pending binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn apply(
        self,
        left: f64,
        right: f64,
    ) -> Result<f64, CalcError> {
        match self {
            Self::Add => Ok(left + right),
            Self::Subtract => Ok(left - right),
            Self::Multiply => Ok(left * right),
            Self::Divide if right == 0.0 => Err(CalcError::DivisionByZero),
            Self::Divide => Ok(left / right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Digit(u8),
    Decimal,
    Arm(Operator),
    Evaluate,
    ClearEntry,
    /// N and I/YR: store the entry, or recall on a new number.
    StoreOrRecall(Register),
    /// PV, PMT and FV: recall on a new number, otherwise solve.
    RecallOrSolve(Register),
    Solve(Register),
    StoreMemory,
    RecallMemory,
    ToggleSecondary,
    ToggleTertiary,
    ToggleSign,
    Help,

    AddDatum,
    MeanX,
    MeanY,
    StdDevX,
    VarianceX,
    Slope,
    Correlation,
    ForecastY,
    ForecastX,
    ClearStatistics,

    Markup,
    Price,
    Cost,
    Margin,

    StraightLine,
    DecliningBalance,
    SumOfYearsDigits,

    AmortizePrincipal,
    BondPrice,
    BondYield,
}

impl Action {
    pub(crate) fn is_modifier(self) -> bool {
        matches!(self, Self::ToggleSecondary | Self::ToggleTertiary)
    }
}

const SECONDARY_TABLE: [(Key, Action); 14] = [
    (Key::Digit(7), Action::MeanX),
    (Key::Digit(8), Action::MeanY),
    (Key::Digit(9), Action::StdDevX),
    (Key::Digit(4), Action::VarianceX),
    (Key::Digit(5), Action::Slope),
    (Key::Digit(6), Action::Correlation),
    (Key::Mu, Action::Markup),
    (Key::Prc, Action::Price),
    (Key::Cst, Action::Cost),
    (Key::Mar, Action::Margin),
    (Key::K, Action::StraightLine),
    (Key::Percent, Action::DecliningBalance),
    (Key::Cfj, Action::SumOfYearsDigits),
    (Key::Sum, Action::AmortizePrincipal),
];

const TERTIARY_TABLE: [(Key, Action); 7] = [
    (Key::Sum, Action::BondPrice),
    (Key::PlusMinus, Action::BondYield),
    (Key::Digit(7), Action::ForecastY),
    (Key::Digit(8), Action::ForecastX),
    (Key::Digit(9), Action::ClearStatistics),
    (Key::N, Action::Solve(Register::Periods)),
    (Key::Iyr, Action::Solve(Register::InterestRate)),
];

/// Resolves `key` in `mode`, falling back to the base table.
pub(crate) fn lookup(
    mode: Mode,
    key: Key,
) -> Option<Action> {
    let shifted = match mode {
        Mode::Base => None,
        Mode::Secondary => find(&SECONDARY_TABLE, key),
        Mode::Tertiary => find(&TERTIARY_TABLE, key),
    };

    shifted.or_else(|| base_action(key))
}

fn find(
    table: &[(Key, Action)],
    key: Key,
) -> Option<Action> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, action)| *action)
}

fn base_action(key: Key) -> Option<Action> {
    let action = match key {
        Key::Digit(digit) if digit <= 9 => Action::Digit(digit),
        Key::Digit(_) => return None,
        Key::Decimal => Action::Decimal,
        Key::Plus => Action::Arm(Operator::Add),
        Key::Minus => Action::Arm(Operator::Subtract),
        Key::Multiply => Action::Arm(Operator::Multiply),
        Key::Divide => Action::Arm(Operator::Divide),
        Key::Equals => Action::Evaluate,
        Key::Clear => Action::ClearEntry,
        Key::N => Action::StoreOrRecall(Register::Periods),
        Key::Iyr => Action::StoreOrRecall(Register::InterestRate),
        Key::Pv => Action::RecallOrSolve(Register::PresentValue),
        Key::Pmt => Action::RecallOrSolve(Register::Payment),
        Key::Fv => Action::RecallOrSolve(Register::FutureValue),
        Key::Input | Key::Mem => Action::StoreMemory,
        Key::Rcl => Action::RecallMemory,
        Key::Orange => Action::ToggleSecondary,
        Key::Blue => Action::ToggleTertiary,
        Key::Cfj => Action::AddDatum,
        Key::Sum => Action::StdDevX,
        Key::PlusMinus => Action::ToggleSign,
        Key::Help => Action::Help,
        Key::Mu | Key::Prc | Key::Cst | Key::Mar | Key::K | Key::Percent => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn shifted_tables_take_precedence() {
        assert_eq!(lookup(Mode::Secondary, Key::Digit(7)), Some(Action::MeanX));
        assert_eq!(lookup(Mode::Tertiary, Key::Digit(7)), Some(Action::ForecastY));
        assert_eq!(lookup(Mode::Base, Key::Digit(7)), Some(Action::Digit(7)));
    }

    #[test]
    fn shifted_lookup_falls_back_to_base() {
        assert_eq!(lookup(Mode::Secondary, Key::Digit(1)), Some(Action::Digit(1)));
        assert_eq!(lookup(Mode::Tertiary, Key::Rcl), Some(Action::RecallMemory));
    }

    #[test]
    fn pricing_keys_do_nothing_unshifted() {
        for key in [Key::Mu, Key::Prc, Key::Cst, Key::Mar, Key::K, Key::Percent] {
            assert_eq!(lookup(Mode::Base, key), None);
            assert_eq!(lookup(Mode::Tertiary, key), None);
        }
    }

    #[test]
    fn tertiary_register_keys_solve() {
        assert_eq!(
            lookup(Mode::Tertiary, Key::Iyr),
            Some(Action::Solve(Register::InterestRate))
        );
        assert_eq!(
            lookup(Mode::Base, Key::Iyr),
            Some(Action::StoreOrRecall(Register::InterestRate))
        );
    }

    #[test]
    fn out_of_range_digit_has_no_action() {
        assert_eq!(lookup(Mode::Base, Key::Digit(10)), None);
    }

    #[test]
    fn divide_by_zero_is_an_error() {
        assert_eq!(Operator::Divide.apply(1.0, 0.0), Err(CalcError::DivisionByZero));
        assert_eq!(Operator::Divide.apply(1.0, 4.0), Ok(0.25));
    }
}
