//! In-memory data source

use std::collections::BTreeMap;
use std::time::Duration;

use super::errors::{SourceError, SourceResult};
use super::table::{Snapshot, TableDump, TableRow};
use super::DataSource;

/// Serves a fixed snapshot held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    snapshot: Snapshot,
    closed: bool,
}

impl MemorySource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            closed: false,
        }
    }

    /// Adds or replaces one table
    pub fn with_table(mut self, name: impl Into<String>, dump: TableDump) -> Self {
        self.snapshot.insert(name.into(), dump);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DataSource for MemorySource {
    fn connection_string(&self) -> SourceResult<String> {
        Ok("memory://".to_string())
    }

    fn dump(&self, _deadline: Duration) -> SourceResult<Snapshot> {
        if self.closed {
            return Err(SourceError::unavailable("memory source is closed"));
        }
        Ok(self.snapshot.clone())
    }

    fn flush(&self, _rows: &BTreeMap<String, Vec<TableRow>>) -> SourceResult<()> {
        Err(SourceError::not_implemented("flush"))
    }

    fn close(&mut self) -> SourceResult<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceErrorCode, TableSchema};

    #[test]
    fn test_dump_and_close() {
        let mut source = MemorySource::default().with_table(
            "users",
            TableDump::new(TableSchema::new(vec!["id".to_string()], vec![]), vec![]),
        );

        let snapshot = source.dump(Duration::from_secs(1)).unwrap();
        assert!(snapshot.contains_key("users"));

        source.close().unwrap();
        assert!(source.is_closed());
        let err = source.dump(Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::Unavailable);
    }

    #[test]
    fn test_flush_not_implemented() {
        let source = MemorySource::default();
        let err = source.flush(&BTreeMap::new()).unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::NotImplemented);
    }
}
