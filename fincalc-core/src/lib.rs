pub mod calculations;
pub mod engine;
mod error;
pub mod models;

pub use engine::{Calculator, DisplayState, KEY_REFERENCE, Key, KeyParseError, Mode};
pub use error::CalcError;
pub use models::*;
