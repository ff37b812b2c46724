//! Data source collaborators
//!
//! A data source owns the connection to a database and can produce a
//! read-only snapshot of every table with its schema. Reconciliation only
//! ever sees the snapshot; how it was fetched is the source's business,
//! including honoring the caller's deadline.

mod errors;
mod json;
mod memory;
mod schema;
mod table;

use std::collections::BTreeMap;
use std::time::Duration;

pub use errors::{SourceError, SourceErrorCode, SourceResult};
pub use json::JsonFileSource;
pub use memory::MemorySource;
pub use schema::{ColumnType, TableSchema, USER_DEFINED};
pub use table::{Snapshot, TableDump, TableRow};

/// Database the expectations are checked against
pub trait DataSource {
    /// Connection string clients of the database would use
    fn connection_string(&self) -> SourceResult<String>;

    /// Dumps every table, failing if `deadline` is exceeded.
    fn dump(&self, deadline: Duration) -> SourceResult<Snapshot>;

    /// Inserts rows, keyed by table name.
    fn flush(&self, rows: &BTreeMap<String, Vec<TableRow>>) -> SourceResult<()>;

    /// Releases the underlying resources
    fn close(&mut self) -> SourceResult<()>;
}
