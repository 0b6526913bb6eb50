//! Keystroke engine: key tokens, per-mode dispatch and the calculator state.

mod calculator;
mod dispatch;
mod display;
mod key;

pub use calculator::Calculator;
pub use dispatch::{Mode, Operator};
pub use display::DisplayState;
pub use key::{KEY_REFERENCE, Key, KeyParseError};
