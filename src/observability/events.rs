//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::{LogLevel, Logger};

/// Observable events in tabsync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Data source
    /// Snapshot dump requested from the data source
    SnapshotFetchBegin,
    /// Snapshot received
    SnapshotFetchComplete,
    /// Dump failed (FATAL)
    SnapshotFetchFailed,

    // Reconciliation
    /// Table reconciliation begins
    ReconcileBegin,
    /// Table reconciliation finished, with or without discrepancies
    ReconcileComplete,
    /// Reconciliation aborted (FATAL)
    ReconcileFailed,
    /// Expected table absent from the snapshot
    TableMissing,
    /// One discrepancy recorded
    DiscrepancyFound,

    // Fixtures
    /// Fixture literal rejected while building a validator (FATAL)
    ValidatorRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SnapshotFetchBegin => "SNAPSHOT_FETCH_BEGIN",
            Event::SnapshotFetchComplete => "SNAPSHOT_FETCH_COMPLETE",
            Event::SnapshotFetchFailed => "SNAPSHOT_FETCH_FAILED",
            Event::ReconcileBegin => "RECONCILE_BEGIN",
            Event::ReconcileComplete => "RECONCILE_COMPLETE",
            Event::ReconcileFailed => "RECONCILE_FAILED",
            Event::TableMissing => "TABLE_MISSING",
            Event::DiscrepancyFound => "DISCREPANCY_FOUND",
            Event::ValidatorRejected => "VALIDATOR_REJECTED",
        }
    }

    /// Level the event is logged at
    pub fn level(&self) -> LogLevel {
        match self {
            Event::DiscrepancyFound => LogLevel::Trace,
            Event::TableMissing => LogLevel::Warn,
            Event::SnapshotFetchFailed | Event::ReconcileFailed | Event::ValidatorRejected => {
                LogLevel::Fatal
            }
            _ => LogLevel::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.level() == LogLevel::Fatal
    }

    /// Logs the event at its level
    pub fn emit(&self, fields: &[(&str, &str)]) {
        Logger::log(self.level(), self.as_str(), fields);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
