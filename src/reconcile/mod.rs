//! Table reconciliation
//!
//! Matches expected rows to dumped rows by primary key and validates every
//! expected cell, collecting all discrepancies into one report.

mod engine;
mod errors;
mod keys;
mod report;

pub use engine::{ReconcileEngine, ReconcileOptions};
pub use errors::{ReconcileError, ReconcileErrorCode, ReconcileResult};
pub use keys::{compare_expected, compare_row_to_key, compare_rows, project_expected, KeyProjection};
pub use report::{Discrepancy, ReconcileReport, ReportEntry};
