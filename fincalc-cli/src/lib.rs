pub mod config_file;
pub mod logging;
pub mod session;

pub use session::{Command, Session};
