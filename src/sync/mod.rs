//! Snapshot validation entry points
//!
//! Ties a data source, fixture expectations and the reconciliation engine
//! together: dump once, reconcile every table, report everything.

mod errors;
mod stubs;
mod tables;

pub use errors::{SyncError, SyncResult};
pub use stubs::{
    flush_csv, flush_fs, flush_raw, validate_result_csv, validate_result_fs,
    validate_result_raw, validate_table_csv, validate_table_fs,
};
pub use tables::{
    build_expectations, validate_literal_tables, validate_tables, LiteralRow, LiteralTables,
    TableExpectations,
};
