//! CLI errors
//!
//! Every variant ends the process with a non-zero status. Data errors found
//! while checking are not CLI errors: they are printed as a JSON response
//! and surface here only as `CheckFailed`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("TABSYNC_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("TABSYNC_CLI_IO_ERROR: cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("TABSYNC_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("TABSYNC_CLI_INPUT_ERROR: {0}")]
    Input(String),

    #[error("TABSYNC_CLI_INPUT_ERROR: malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The printed response carried this code
    #[error("TABSYNC_CLI_CHECK_FAILED: {0}")]
    CheckFailed(String),
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        CliError::Input(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "TABSYNC_CLI_CONFIG_ERROR",
            CliError::Read { .. } | CliError::Io(_) => "TABSYNC_CLI_IO_ERROR",
            CliError::Input(_) | CliError::Json(_) => "TABSYNC_CLI_INPUT_ERROR",
            CliError::CheckFailed(_) => "TABSYNC_CLI_CHECK_FAILED",
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
