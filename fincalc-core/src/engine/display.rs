use serde::{Deserialize, Serialize};

/// What the calculator face shows after a key press.
///
/// Register fields are already formatted with
/// [`format_number`](crate::calculations::format_number).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Main display line: the entry in progress or the last result.
    pub display: String,
    pub n: String,
    pub iyr: String,
    pub pv: String,
    pub pmt: String,
    pub fv: String,
    /// `"O"`, `"B"` or empty.
    pub indicator: String,
    /// Set when the last key was `help`.
    pub help_requested: bool,
}
