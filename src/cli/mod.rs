pub mod commands;
pub mod exit_code;
pub mod options;
pub mod output;

pub use commands::*;
pub use exit_code::*;
pub use options::*;
pub use output::*;
