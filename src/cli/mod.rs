//! Terminal front end: landing portal, signup assistant, output helpers.

pub mod assistant;
pub mod core;
pub mod io;
pub mod output;
pub mod portal;

pub use self::core::{cli_mode, run_cli, CliError, CliMode};
