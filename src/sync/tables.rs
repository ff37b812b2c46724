//! Multi-table validation against a data source

use std::collections::BTreeMap;

use super::errors::{SyncError, SyncResult};
use crate::config::SyncConfig;
use crate::observability::{Event, ObservationScope};
use crate::reconcile::{Discrepancy, ReconcileEngine, ReconcileReport};
use crate::source::{DataSource, Snapshot, TableDump, TableSchema};
use crate::validator::{ExpectedRow, ValidatorError, ValidatorFactory, ValidatorResult};

/// Expected rows keyed by table name
pub type TableExpectations = BTreeMap<String, Vec<ExpectedRow>>;

/// Fixture row: column name to literal text
pub type LiteralRow = BTreeMap<String, String>;

/// Literal fixture rows keyed by table name
pub type LiteralTables = BTreeMap<String, Vec<LiteralRow>>;

/// Builds the expected rows of one table from fixture literals.
///
/// Declared types come from `schema`, nullable columns carrying the
/// nullable marker; predicates are refused on its primary keys.
///
/// # Errors
///
/// `TABSYNC_UNKNOWN_COLUMN` for a column the schema does not describe, or
/// any validator construction error.
pub fn build_expectations(
    schema: &TableSchema,
    rows: &[LiteralRow],
) -> ValidatorResult<Vec<ExpectedRow>> {
    let factory = ValidatorFactory::new(schema.primary_keys.clone());

    let mut expected = Vec::with_capacity(rows.len());
    for row in rows {
        let mut validators = ExpectedRow::new();
        for (column, literal) in row {
            let declared = schema
                .declared_type(column)
                .ok_or_else(|| ValidatorError::unknown_column(column))?;
            let validator = factory
                .build(column, &declared, literal)
                .map_err(|e| e.in_column(column))?;
            validators.insert(column.clone(), validator);
        }
        expected.push(validators);
    }

    Ok(expected)
}

/// Dumps `source` once and reconciles every expected table.
///
/// Tables missing from the snapshot are reported and skipped.
///
/// # Errors
///
/// - `TABSYNC_SNAPSHOT_MISMATCH` carrying every discrepancy found
/// - any dump or reconcile error, which aborts the whole call
pub fn validate_tables(
    source: &dyn DataSource,
    expected: &TableExpectations,
    config: &SyncConfig,
) -> SyncResult<()> {
    observe(expected.len(), || {
        let snapshot = fetch(source, config)?;
        let engine = ReconcileEngine::new(config.reconcile_options());

        let mut report = ReconcileReport::new();
        for (table, rows) in expected {
            let Some(dump) = locate(&snapshot, table, &mut report) else {
                continue;
            };
            report.merge(engine.reconcile_table(table, dump, rows)?);
        }

        report.into_result().map_err(SyncError::Mismatch)
    })
}

/// Same as `validate_tables`, building the expectations from fixture
/// literals against the dumped schemas.
pub fn validate_literal_tables(
    source: &dyn DataSource,
    literals: &LiteralTables,
    config: &SyncConfig,
) -> SyncResult<()> {
    observe(literals.len(), || {
        let snapshot = fetch(source, config)?;
        let engine = ReconcileEngine::new(config.reconcile_options());

        let mut report = ReconcileReport::new();
        for (table, rows) in literals {
            let Some(dump) = locate(&snapshot, table, &mut report) else {
                continue;
            };

            let expected = build_expectations(&dump.schema, rows).map_err(|e| {
                Event::ValidatorRejected.emit(&[("table", table.as_str()), ("reason", e.message())]);
                e
            })?;
            report.merge(engine.reconcile_table(table, dump, &expected)?);
        }

        report.into_result().map_err(SyncError::Mismatch)
    })
}

/// Dumps the source within the configured deadline
pub(crate) fn fetch(source: &dyn DataSource, config: &SyncConfig) -> SyncResult<Snapshot> {
    let timeout = config.dump_timeout_ms.to_string();
    Event::SnapshotFetchBegin.emit(&[("timeout_ms", timeout.as_str())]);

    match source.dump(config.dump_deadline()) {
        Ok(snapshot) => {
            let tables = snapshot.len().to_string();
            Event::SnapshotFetchComplete.emit(&[("tables", tables.as_str())]);
            Ok(snapshot)
        }
        Err(e) => {
            Event::SnapshotFetchFailed.emit(&[
                ("code", e.code().code()),
                ("reason", e.message()),
            ]);
            Err(e.into())
        }
    }
}

fn locate<'a>(
    snapshot: &'a Snapshot,
    table: &str,
    report: &mut ReconcileReport,
) -> Option<&'a TableDump> {
    let dump = snapshot.get(table);
    if dump.is_none() {
        Event::TableMissing.emit(&[("table", table)]);
        report.push(Some(table), Discrepancy::TableNotFound);
    }
    dump
}

fn observe(tables: usize, run: impl FnOnce() -> SyncResult<()>) -> SyncResult<()> {
    let tables = tables.to_string();
    let scope = ObservationScope::with_fields("VALIDATE_TABLES", &[("tables", tables.as_str())]);

    let result = run();
    match &result {
        Ok(()) => scope.complete_with_fields(&[("discrepancies", "0")]),
        Err(SyncError::Mismatch(report)) => {
            let count = report.len().to_string();
            scope.complete_with_fields(&[("discrepancies", count.as_str())]);
        }
        Err(e) => scope.fail_fatal(&e.to_string()),
    }
    result
}
