//! Snapshot validation errors
//!
//! - TABSYNC_SNAPSHOT_MISMATCH (ERROR): discrepancies were found, the
//!   report lists every one of them
//! - TABSYNC_TABLE_NOT_FOUND (FATAL): a fixture names a table the
//!   database does not have
//! - wrapped source, validator, reconcile and config errors (FATAL)

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::Severity;
use crate::reconcile::{ReconcileError, ReconcileReport};
use crate::source::SourceError;
use crate::validator::ValidatorError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("[FATAL] TABSYNC_TABLE_NOT_FOUND: table {0:?} does not exist in database")]
    TableNotFound(String),

    #[error("[ERROR] TABSYNC_SNAPSHOT_MISMATCH: {} discrepancies\n{0}", .0.len())]
    Mismatch(ReconcileReport),
}

impl SyncError {
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::Source(e) => e.code().code(),
            SyncError::Validator(e) => e.code().code(),
            SyncError::Reconcile(e) => e.code().code(),
            SyncError::Config(e) => e.code().code(),
            SyncError::TableNotFound(_) => "TABSYNC_TABLE_NOT_FOUND",
            SyncError::Mismatch(_) => "TABSYNC_SNAPSHOT_MISMATCH",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SyncError::Mismatch(_) => Severity::Error,
            _ => Severity::Fatal,
        }
    }

    /// The discrepancy report, when the snapshot did not match
    pub fn report(&self) -> Option<&ReconcileReport> {
        match self {
            SyncError::Mismatch(report) => Some(report),
            _ => None,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
