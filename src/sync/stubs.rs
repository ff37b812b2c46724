//! Fixture ingestion and flush entry points
//!
//! File-system and CSV fixtures are not supported yet; those entry points
//! fail with `TABSYNC_NOT_IMPLEMENTED`.

use std::collections::BTreeMap;
use std::path::Path;

use super::errors::{SyncError, SyncResult};
use super::tables::{fetch, LiteralTables, TableExpectations};
use crate::config::SyncConfig;
use crate::expr::BuiltinEngine;
use crate::source::{DataSource, SourceError, TableRow};
use crate::validator::{resolve_value, ValidatorError};

fn not_implemented(what: &str) -> SyncError {
    SourceError::not_implemented(what).into()
}

/// Inserts fixture files found under `dir`
pub fn flush_fs(_source: &dyn DataSource, _dir: &Path) -> SyncResult<()> {
    Err(not_implemented("flush_fs"))
}

/// Inserts CSV fixtures, keyed by table name
pub fn flush_csv(_source: &dyn DataSource, _data: &BTreeMap<String, String>) -> SyncResult<()> {
    Err(not_implemented("flush_csv"))
}

/// Resolves literal rows against the dumped schemas and hands them to
/// `DataSource::flush`.
///
/// `=`-prefixed literals are evaluated with no names bound.
pub fn flush_raw(
    source: &dyn DataSource,
    data: &LiteralTables,
    config: &SyncConfig,
) -> SyncResult<()> {
    let snapshot = fetch(source, config)?;
    let engine = BuiltinEngine::new();

    let mut resolved = BTreeMap::new();
    for (table, rows) in data {
        let schema = &snapshot
            .get(table)
            .ok_or_else(|| SyncError::TableNotFound(table.clone()))?
            .schema;

        let mut table_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let mut values = TableRow::new();
            for (column, literal) in row {
                let declared = schema
                    .declared_type(column)
                    .ok_or_else(|| ValidatorError::unknown_column(column))?;
                let value = resolve_value(&engine, &declared, literal)
                    .map_err(|e| e.in_column(column))?;
                values.insert(column.clone(), value);
            }
            table_rows.push(values);
        }
        resolved.insert(table.clone(), table_rows);
    }

    source.flush(&resolved)?;
    Ok(())
}

/// Validates tables against fixture files found under `dir`
pub fn validate_table_fs(_source: &dyn DataSource, _dir: &Path) -> SyncResult<()> {
    Err(not_implemented("validate_table_fs"))
}

/// Validates tables against CSV fixtures, keyed by table name
pub fn validate_table_csv(
    _source: &dyn DataSource,
    _data: &BTreeMap<String, String>,
) -> SyncResult<()> {
    Err(not_implemented("validate_table_csv"))
}

/// Validates a query result against fixture files found under `dir`
pub fn validate_result_fs(_source: &dyn DataSource, _dir: &Path) -> SyncResult<()> {
    Err(not_implemented("validate_result_fs"))
}

/// Validates a query result against CSV fixtures
pub fn validate_result_csv(
    _source: &dyn DataSource,
    _data: &BTreeMap<String, String>,
) -> SyncResult<()> {
    Err(not_implemented("validate_result_csv"))
}

/// Validates a query result against expected rows
pub fn validate_result_raw(
    _source: &dyn DataSource,
    _expected: &TableExpectations,
) -> SyncResult<()> {
    Err(not_implemented("validate_result_raw"))
}
