use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A token that does not name any calculator key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown key '{0}'")]
pub struct KeyParseError(pub String);

/// One physical key on the calculator face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A digit key, `0` through `9`.
    Digit(u8),
    Decimal,
    Plus,
    Minus,
    Multiply,
    Divide,
    Equals,
    Clear,
    N,
    Iyr,
    Pv,
    Pmt,
    Fv,
    Input,
    Mem,
    Rcl,
    /// Secondary (orange) modifier.
    Orange,
    /// Tertiary (blue) modifier.
    Blue,
    Cfj,
    Sum,
    PlusMinus,
    Mu,
    Prc,
    Cst,
    Mar,
    K,
    Percent,
    Help,
}

const DIGIT_TOKENS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl Key {
    /// Every key, digits first.
    pub const ALL: [Key; 37] = [
        Self::Digit(0),
        Self::Digit(1),
        Self::Digit(2),
        Self::Digit(3),
        Self::Digit(4),
        Self::Digit(5),
        Self::Digit(6),
        Self::Digit(7),
        Self::Digit(8),
        Self::Digit(9),
        Self::Decimal,
        Self::Plus,
        Self::Minus,
        Self::Multiply,
        Self::Divide,
        Self::Equals,
        Self::Clear,
        Self::N,
        Self::Iyr,
        Self::Pv,
        Self::Pmt,
        Self::Fv,
        Self::Input,
        Self::Mem,
        Self::Rcl,
        Self::Orange,
        Self::Blue,
        Self::Cfj,
        Self::Sum,
        Self::PlusMinus,
        Self::Mu,
        Self::Prc,
        Self::Cst,
        Self::Mar,
        Self::K,
        Self::Percent,
        Self::Help,
    ];

    /// Token used for this key by scripts and the REPL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Digit(digit) => DIGIT_TOKENS
                .get(usize::from(*digit))
                .copied()
                .unwrap_or("?"),
            Self::Decimal => "decimal",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Equals => "equals",
            Self::Clear => "clear",
            Self::N => "n",
            Self::Iyr => "iyr",
            Self::Pv => "pv",
            Self::Pmt => "pmt",
            Self::Fv => "fv",
            Self::Input => "input",
            Self::Mem => "mem",
            Self::Rcl => "rcl",
            Self::Orange => "orange",
            Self::Blue => "blue",
            Self::Cfj => "cfj",
            Self::Sum => "sum",
            Self::PlusMinus => "plusminus",
            Self::Mu => "mu",
            Self::Prc => "prc",
            Self::Cst => "cst",
            Self::Mar => "mar",
            Self::K => "k",
            Self::Percent => "percent",
            Self::Help => "help",
        }
    }

    /// Parses a key token, ignoring ASCII case.
    ///
    /// ```
    /// use fincalc_core::Key;
    ///
    /// assert_eq!(Key::parse("PMT"), Ok(Key::Pmt));
    /// assert_eq!(Key::parse("7"), Ok(Key::Digit(7)));
    /// assert!(Key::parse("sqrt").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Self, KeyParseError> {
        let token = token.trim();
        Self::ALL
            .iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(token))
            .copied()
            .ok_or_else(|| KeyParseError(token.to_string()))
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Key {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable key map, one key per line.
pub const KEY_REFERENCE: &str = "\
Key tokens (O = after `orange`, B = after `blue`)

  0-9 decimal        enter a number
                     O: 7 mean x, 8 mean y, 9 std dev x,
                        4 variance x, 5 regression slope, 6 correlation
                     B: 7 forecast y from x, 8 forecast x from y,
                        9 clear statistics
  plus minus multiply divide equals
                     arithmetic
  clear              clear entry
  n iyr              store the entry, or recall when starting a new number
                     B: solve N / solve I/YR
  pv pmt fv          recall when starting a new number, otherwise solve
  input mem          store the entry in memory
  rcl                recall memory
  orange blue        one-shot modifiers
  cfj                add statistics point (x = entry, y = memory)
                     O: sum-of-years-digits depreciation (year = entry)
  sum                std dev x
                     O: amortization principal (period = entry)
                     B: bond price (yield = entry)
  plusminus          toggle sign
                     B: bond yield (price = entry)
  mu prc cst mar     O: markup / price / cost / margin
                        (entry with memory as price or markup)
  k                  O: straight-line depreciation (cost = entry)
  percent            O: declining-balance depreciation (rate = entry)
  help               show this reference
";

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_key_round_trips_through_its_token() {
        for key in Key::ALL {
            assert_eq!(Key::parse(key.as_str()), Ok(key));
        }
    }

    #[test]
    fn parse_ignores_case_and_surrounding_whitespace() {
        assert_eq!(Key::parse(" PlusMinus "), Ok(Key::PlusMinus));
        assert_eq!(" IYR".parse::<Key>(), Ok(Key::Iyr));
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert_eq!(Key::parse("10"), Err(KeyParseError("10".to_string())));
        assert_eq!(Key::parse(""), Err(KeyParseError(String::new())));
    }

    #[test]
    fn reference_mentions_every_key() {
        for key in Key::ALL.iter().filter(|key| !matches!(key, Key::Digit(_))) {
            assert!(
                KEY_REFERENCE.contains(key.as_str()),
                "missing {key} in reference"
            );
        }
    }
}
