//! CLI module for tabsync
//!
//! - check: reconcile a JSON snapshot against expectation literals
//! - eval: validate one value against one fixture literal

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, eval, load_config, read_expectations, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{error_response, ok_response, report_response, write_json};
