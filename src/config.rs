//! Reconciliation configuration
//!
//! Loaded from a JSON file. Every field has a default, so `{}` is a valid
//! configuration.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Severity;
use crate::observability::LogLevel;
use crate::reconcile::ReconcileOptions;
use crate::value::NullPlacement;

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// File could not be read
    Unreadable,
    /// File is not valid JSON or has a value out of range
    Invalid,
}

impl ConfigErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::Unreadable => "TABSYNC_CONFIG_UNREADABLE",
            ConfigErrorCode::Invalid => "TABSYNC_CONFIG_INVALID",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
}

impl ConfigError {
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::Unreadable,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::Invalid,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for snapshot validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Deadline handed to the data source dump, in milliseconds (default 10000)
    #[serde(default = "default_dump_timeout_ms")]
    pub dump_timeout_ms: u64,

    /// Sort NULL key values before every other value (default false)
    #[serde(default)]
    pub nulls_first: bool,

    /// Minimum log level: trace, info, warn, error or fatal (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_dump_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dump_timeout_ms: default_dump_timeout_ms(),
            nulls_first: false,
            log_level: default_log_level(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::unreadable(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: SyncConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::invalid(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.dump_timeout_ms == 0 {
            return Err(ConfigError::invalid("dump_timeout_ms must be > 0"));
        }

        self.log_level()?;

        Ok(())
    }

    pub fn log_level(&self) -> ConfigResult<LogLevel> {
        self.log_level.parse().map_err(ConfigError::invalid)
    }

    pub fn dump_deadline(&self) -> Duration {
        Duration::from_millis(self.dump_timeout_ms)
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            nulls: NullPlacement::from_nulls_first(self.nulls_first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("tabsync.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SyncConfig::load(&write(&dir, "{}")).unwrap();

        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.dump_deadline(), Duration::from_secs(10));
        assert_eq!(config.reconcile_options().nulls, NullPlacement::Last);
        assert_eq!(config.log_level().unwrap(), LogLevel::Info);
    }

    #[test]
    fn test_config_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{"dump_timeout_ms": 250, "nulls_first": true, "log_level": "warn"}"#,
        );
        let config = SyncConfig::load(&path).unwrap();

        assert_eq!(config.dump_deadline(), Duration::from_millis(250));
        assert_eq!(config.reconcile_options().nulls, NullPlacement::First);
        assert_eq!(config.log_level().unwrap(), LogLevel::Warn);
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let dir = TempDir::new().unwrap();
        let err = SyncConfig::load(&write(&dir, r#"{"dump_timeout_ms": 0}"#)).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Invalid);
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let dir = TempDir::new().unwrap();
        let err = SyncConfig::load(&write(&dir, r#"{"log_level": "verbose"}"#)).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Invalid);
    }

    #[test]
    fn test_config_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SyncConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Unreadable);
    }
}
