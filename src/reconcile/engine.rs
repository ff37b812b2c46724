//! Table reconciliation
//!
//! 1. Sort dumped rows by primary-key projection
//! 2. Sort expected rows by their constant keys, unresolved keys last
//! 3. Locate each expected row by binary search and validate its cells
//!
//! Discrepancies never stop the walk; only configuration errors and
//! internal defects do.

use super::errors::{ReconcileError, ReconcileResult};
use super::keys::{compare_expected, compare_row_to_key, compare_rows, project_expected};
use super::report::{Discrepancy, ReconcileReport};
use crate::observability::{Event, LogLevel, Logger};
use crate::source::{TableDump, TableRow};
use crate::validator::{ExpectedRow, ValidationError};
use crate::value::NullPlacement;

/// Options threaded through one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Where NULL key values sort
    pub nulls: NullPlacement,
}

/// Reconciles table dumps against expected rows
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileEngine {
    options: ReconcileOptions,
}

impl ReconcileEngine {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ReconcileOptions {
        self.options
    }

    /// Reconciles one table.
    ///
    /// Returns the complete report of discrepancies (empty on a full match).
    ///
    /// # Errors
    ///
    /// - `TABSYNC_NO_PRIMARY_KEY` if the schema has no primary key
    /// - `TABSYNC_INTERNAL_DEFECT` if a predicate fails at run time
    pub fn reconcile(
        &self,
        dump: &TableDump,
        expected: &[ExpectedRow],
    ) -> ReconcileResult<ReconcileReport> {
        self.run(None, dump, expected)
    }

    /// Same as `reconcile`, with every entry tagged with `table`
    pub fn reconcile_table(
        &self,
        table: &str,
        dump: &TableDump,
        expected: &[ExpectedRow],
    ) -> ReconcileResult<ReconcileReport> {
        self.run(Some(table), dump, expected)
    }

    fn run(
        &self,
        table: Option<&str>,
        dump: &TableDump,
        expected: &[ExpectedRow],
    ) -> ReconcileResult<ReconcileReport> {
        let keys = &dump.schema.primary_keys;
        if keys.is_empty() {
            let err = ReconcileError::no_primary_key(table);
            Event::ReconcileFailed.emit(&[("table", table.unwrap_or("")), ("reason", err.message())]);
            return Err(err);
        }

        let table_field = table.unwrap_or("");
        let row_count = dump.rows.len().to_string();
        let expected_count = expected.len().to_string();
        Event::ReconcileBegin.emit(&[
            ("table", table_field),
            ("rows", row_count.as_str()),
            ("expected", expected_count.as_str()),
        ]);

        let nulls = self.options.nulls;

        let mut rows: Vec<&TableRow> = dump.rows.iter().collect();
        rows.sort_by(|a, b| compare_rows(a, b, keys, nulls));

        let mut wanted: Vec<&ExpectedRow> = expected.iter().collect();
        wanted.sort_by(|a, b| compare_expected(a, b, keys, nulls));

        let mut report = ReconcileReport::new();
        let mut record = |discrepancy: Discrepancy| {
            if Logger::enabled(LogLevel::Trace) {
                Event::DiscrepancyFound.emit(&[
                    ("table", table_field),
                    ("kind", discrepancy.kind()),
                    ("detail", discrepancy.to_string().as_str()),
                ]);
            }
            report.push(table, discrepancy);
        };

        for want in wanted {
            let key = match project_expected(want, keys) {
                Ok(key) => key,
                Err(columns) => {
                    record(Discrepancy::RowKeyUnresolved { columns });
                    continue;
                }
            };

            let Ok(index) = rows.binary_search_by(|row| compare_row_to_key(row, &key, nulls)) else {
                record(Discrepancy::RowNotFound { key });
                continue;
            };
            let row = rows[index];

            for (column, validator) in want.iter() {
                let Some(actual) = row.get(column) else {
                    record(Discrepancy::ColumnNotFound {
                        key: key.clone(),
                        column: column.to_string(),
                    });
                    continue;
                };

                match validator.validate(actual) {
                    Ok(()) => {}
                    Err(ValidationError::Mismatch(mismatch)) => {
                        record(Discrepancy::CellMismatch {
                            key: key.clone(),
                            column: column.to_string(),
                            mismatch,
                        });
                    }
                    Err(ValidationError::Internal(message)) => {
                        let err = ReconcileError::internal_defect(format!(
                            "row {}, column {:?}: {}",
                            key, column, message
                        ));
                        Event::ReconcileFailed
                            .emit(&[("table", table_field), ("reason", err.message())]);
                        return Err(err);
                    }
                }
            }
        }

        let discrepancies = report.len().to_string();
        Event::ReconcileComplete.emit(&[
            ("table", table_field),
            ("discrepancies", discrepancies.as_str()),
        ]);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::ReconcileErrorCode;
    use crate::source::{ColumnType, TableSchema};
    use crate::validator::{ConstantValidator, Mismatch, ValidatorFactory};
    use crate::value::ScalarValue;

    fn users() -> TableDump {
        let row = |id: i64, name: &str| {
            TableRow::from([
                ("id".to_string(), ScalarValue::Integer(id)),
                ("name".to_string(), ScalarValue::from(name)),
            ])
        };
        TableDump::new(
            TableSchema::new(
                vec!["id".to_string()],
                vec![ColumnType::new("id", "integer"), ColumnType::new("name", "text")],
            ),
            vec![row(2, "b"), row(1, "a")],
        )
    }

    fn expect(id: i64, name: &str) -> ExpectedRow {
        let factory = ValidatorFactory::new(vec!["id".to_string()]);
        let mut row = ExpectedRow::new();
        row.insert("id", factory.build("id", "integer", &id.to_string()).unwrap());
        row.insert("name", factory.build("name", "text", name).unwrap());
        row
    }

    #[test]
    fn test_full_match() {
        let report = ReconcileEngine::default()
            .reconcile(&users(), &[expect(2, "b"), expect(1, "a")])
            .unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_all_discrepancies_are_collected() {
        let unresolved =
            ExpectedRow::new().with("name", ConstantValidator::new(ScalarValue::from("a")));
        let extra_column = expect(1, "a").with("age", ConstantValidator::new(ScalarValue::Integer(3)));

        let report = ReconcileEngine::default()
            .reconcile_table(
                "users",
                &users(),
                &[unresolved, expect(3, "x"), expect(2, "=value == 'c'"), extra_column],
            )
            .unwrap();

        let kinds: Vec<&str> = report.discrepancies().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec!["column_not_found", "cell_mismatch", "row_not_found", "row_key_unresolved"]
        );
        assert!(report
            .entries()
            .iter()
            .all(|e| e.table.as_deref() == Some("users")));

        match &report.entries()[1].discrepancy {
            Discrepancy::CellMismatch { key, column, mismatch } => {
                assert_eq!(key.to_string(), "{id: 2}");
                assert_eq!(column, "name");
                assert!(matches!(mismatch, Mismatch::PredicateFailed { .. }));
            }
            other => panic!("unexpected discrepancy {:?}", other),
        }
    }

    #[test]
    fn test_no_primary_key_is_fatal() {
        let mut dump = users();
        dump.schema.primary_keys.clear();

        let err = ReconcileEngine::default().reconcile(&dump, &[]).unwrap_err();
        assert_eq!(err.code(), ReconcileErrorCode::NoPrimaryKey);
    }

    #[test]
    fn test_runtime_predicate_failure_aborts() {
        let mut dump = users();
        dump.rows[0].insert("age".to_string(), ScalarValue::Null);

        let factory = ValidatorFactory::new(vec!["id".to_string()]);
        let mut row = expect(2, "b");
        row.insert("age", factory.build("age", "?integer", "=value > 18").unwrap());

        let err = ReconcileEngine::default().reconcile(&dump, &[row]).unwrap_err();
        assert_eq!(err.code(), ReconcileErrorCode::InternalDefect);
    }
}
