//! JSON snapshot file source
//!
//! The file holds a serialized `Snapshot`: table name to `{schema, rows}`,
//! with cell values externally tagged (`{"Integer": 1}`, `"Null"`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::errors::{SourceError, SourceResult};
use super::table::{Snapshot, TableRow};
use super::DataSource;

/// Reads snapshots from a JSON file on every dump
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for JsonFileSource {
    fn connection_string(&self) -> SourceResult<String> {
        Ok(format!("file://{}", self.path.display()))
    }

    fn dump(&self, deadline: Duration) -> SourceResult<Snapshot> {
        let start = Instant::now();

        let bytes = fs::read(&self.path).map_err(|e| {
            SourceError::unavailable(format!("cannot read snapshot {}", self.path.display()))
                .with_source(e)
        })?;

        let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| {
            SourceError::decode(format!("malformed snapshot {}: {}", self.path.display(), e))
                .with_source(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > deadline {
            return Err(SourceError::timeout(elapsed, deadline));
        }

        Ok(snapshot)
    }

    fn flush(&self, _rows: &BTreeMap<String, Vec<TableRow>>) -> SourceResult<()> {
        Err(SourceError::not_implemented("flush"))
    }

    fn close(&mut self) -> SourceResult<()> {
        Ok(())
    }
}
