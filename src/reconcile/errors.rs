//! Reconciliation error types
//!
//! Fatal errors only. Data discrepancies are not errors of the engine;
//! they are collected in a `ReconcileReport`.
//!
//! - TABSYNC_NO_PRIMARY_KEY (FATAL): rows cannot be matched
//! - TABSYNC_INTERNAL_DEFECT (FATAL): a compiled predicate failed at run time

use std::fmt;

use crate::errors::Severity;

/// Reconciliation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileErrorCode {
    NoPrimaryKey,
    InternalDefect,
}

impl ReconcileErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ReconcileErrorCode::NoPrimaryKey => "TABSYNC_NO_PRIMARY_KEY",
            ReconcileErrorCode::InternalDefect => "TABSYNC_INTERNAL_DEFECT",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for ReconcileErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error that aborts a reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileError {
    code: ReconcileErrorCode,
    message: String,
}

impl ReconcileError {
    /// Table schema declares no primary key
    pub fn no_primary_key(table: Option<&str>) -> Self {
        let message = match table {
            Some(table) => format!(
                "table {:?}: at least one primary key is required to match rows",
                table
            ),
            None => "at least one primary key is required to match rows".to_string(),
        };
        Self {
            code: ReconcileErrorCode::NoPrimaryKey,
            message,
        }
    }

    pub fn internal_defect(message: impl Into<String>) -> Self {
        Self {
            code: ReconcileErrorCode::InternalDefect,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ReconcileErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for ReconcileError {}

/// Result type for reconciliation
pub type ReconcileResult<T> = Result<T, ReconcileError>;
