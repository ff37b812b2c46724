//! Aggregated reconciliation report

use std::fmt;

use thiserror::Error;

use super::keys::KeyProjection;
use crate::validator::Mismatch;

/// One difference between a snapshot and its expectations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Discrepancy {
    #[error("row has unresolved primary key ({})", .columns.join(", "))]
    RowKeyUnresolved { columns: Vec<String> },

    #[error("row {key}: not found in snapshot")]
    RowNotFound { key: KeyProjection },

    #[error("row {key}: column {column:?} not found")]
    ColumnNotFound { key: KeyProjection, column: String },

    #[error("row {key}, column {column:?}: {mismatch}")]
    CellMismatch {
        key: KeyProjection,
        column: String,
        mismatch: Mismatch,
    },

    #[error("not exists in database")]
    TableNotFound,
}

impl Discrepancy {
    /// Stable machine-readable name of the discrepancy kind
    pub fn kind(&self) -> &'static str {
        match self {
            Discrepancy::RowKeyUnresolved { .. } => "row_key_unresolved",
            Discrepancy::RowNotFound { .. } => "row_not_found",
            Discrepancy::ColumnNotFound { .. } => "column_not_found",
            Discrepancy::CellMismatch { .. } => "cell_mismatch",
            Discrepancy::TableNotFound => "table_not_found",
        }
    }
}

/// A discrepancy with the table it was found in
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub table: Option<String>,
    pub discrepancy: Discrepancy,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "table {:?}: {}", table, self.discrepancy),
            None => write!(f, "{}", self.discrepancy),
        }
    }
}

/// Every discrepancy found by one call, in discovery order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    entries: Vec<ReportEntry>,
}

impl ReconcileReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, table: Option<&str>, discrepancy: Discrepancy) {
        self.entries.push(ReportEntry {
            table: table.map(str::to_string),
            discrepancy,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn discrepancies(&self) -> impl Iterator<Item = &Discrepancy> {
        self.entries.iter().map(|e| &e.discrepancy)
    }

    /// True when nothing was found
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends the entries of `other`
    pub fn merge(&mut self, other: ReconcileReport) {
        self.entries.extend(other.entries);
    }

    /// `Ok` for a clean report, the report itself otherwise
    pub fn into_result(self) -> Result<(), ReconcileReport> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReconcileReport {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TableRow;
    use crate::value::ScalarValue;

    fn key(id: i64) -> KeyProjection {
        let row = TableRow::from([("id".to_string(), ScalarValue::Integer(id))]);
        KeyProjection::of_row(&row, &["id".to_string()])
    }

    #[test]
    fn test_report_display_joins_lines() {
        let mut report = ReconcileReport::new();
        report.push(Some("users"), Discrepancy::RowNotFound { key: key(3) });
        report.push(
            None,
            Discrepancy::ColumnNotFound {
                key: key(1),
                column: "age".to_string(),
            },
        );

        assert_eq!(
            report.to_string(),
            "table \"users\": row {id: 3}: not found in snapshot\nrow {id: 1}: column \"age\" not found"
        );
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_merge_and_into_result() {
        assert!(ReconcileReport::new().into_result().is_ok());

        let mut a = ReconcileReport::new();
        let mut b = ReconcileReport::new();
        b.push(Some("orders"), Discrepancy::TableNotFound);
        a.merge(b);

        let err = a.into_result().unwrap_err();
        assert_eq!(err.entries()[0].discrepancy.kind(), "table_not_found");
        assert_eq!(err.to_string(), "table \"orders\": not exists in database");
    }

    #[test]
    fn test_unresolved_key_display() {
        let d = Discrepancy::RowKeyUnresolved {
            columns: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(d.to_string(), "row has unresolved primary key (a, b)");
    }
}
