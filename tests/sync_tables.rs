//! Snapshot validation through a data source
//!
//! Snapshots are written to temp files and read back through
//! `JsonFileSource`, the way a test harness would point the library at a
//! database dump.

use std::collections::BTreeMap;
use std::io::Write;

use tabsync::config::SyncConfig;
use tabsync::source::{ColumnType, JsonFileSource, MemorySource, TableDump, TableSchema};
use tabsync::sync::{
    flush_csv, flush_raw, validate_literal_tables, validate_tables, LiteralRow, LiteralTables,
    SyncError, TableExpectations,
};
use tabsync::validator::{ConstantValidator, ExpectedRow};
use tabsync::value::ScalarValue;
use tempfile::NamedTempFile;

const SNAPSHOT: &str = r#"{
    "users": {
        "schema": {
            "primary_keys": ["id"],
            "columns": [
                {"name": "id", "data_type": "integer"},
                {"name": "name", "data_type": "text"},
                {"name": "age", "data_type": "integer", "is_nullable": true}
            ]
        },
        "rows": [
            {"id": {"Integer": 2}, "name": {"String": "b"}, "age": "Null"},
            {"id": {"Integer": 1}, "name": {"String": "a"}, "age": {"Integer": 30}}
        ]
    },
    "orders": {
        "schema": {
            "primary_keys": ["user_id", "number"],
            "columns": [
                {"name": "user_id", "data_type": "integer"},
                {"name": "number", "data_type": "integer"},
                {"name": "total", "data_type": "double precision"}
            ]
        },
        "rows": [
            {"user_id": {"Integer": 1}, "number": {"Integer": 1}, "total": {"Float": 9.5}}
        ]
    }
}"#;

fn snapshot_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    file
}

fn row(pairs: &[(&str, &str)]) -> LiteralRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn tables(entries: Vec<(&str, Vec<LiteralRow>)>) -> LiteralTables {
    entries
        .into_iter()
        .map(|(table, rows)| (table.to_string(), rows))
        .collect()
}

// =============================================================================
// LITERAL FIXTURES
// =============================================================================

#[test]
fn test_matching_fixtures_pass() {
    let file = snapshot_file();
    let source = JsonFileSource::new(file.path());

    let literals = tables(vec![
        (
            "users",
            vec![
                row(&[("id", "1"), ("name", "a"), ("age", "=value >= 18")]),
                row(&[("id", "2"), ("name", "=value startsWith 'b'")]),
            ],
        ),
        (
            "orders",
            vec![row(&[("user_id", "1"), ("number", "1"), ("total", "9.5")])],
        ),
    ]);

    validate_literal_tables(&source, &literals, &SyncConfig::default()).unwrap();
}

#[test]
fn test_nullable_catalog_column_accepts_null_fixtures() {
    let file = snapshot_file();
    let source = JsonFileSource::new(file.path());

    let literals = tables(vec![(
        "users",
        vec![
            row(&[("id", "2"), ("age", "null")]),
            row(&[("id", "2"), ("age", "=value == nil")]),
        ],
    )]);

    validate_literal_tables(&source, &literals, &SyncConfig::default()).unwrap();
}

#[test]
fn test_every_table_is_reported() {
    let file = snapshot_file();
    let source = JsonFileSource::new(file.path());

    let literals = tables(vec![
        ("users", vec![row(&[("id", "1"), ("name", "z")])]),
        ("orders", vec![row(&[("user_id", "1"), ("number", "2")])]),
        ("invoices", vec![row(&[("id", "1")])]),
    ]);

    let err = validate_literal_tables(&source, &literals, &SyncConfig::default()).unwrap_err();
    assert_eq!(err.code(), "TABSYNC_SNAPSHOT_MISMATCH");

    let report = err.report().unwrap();
    let found: Vec<(Option<&str>, &str)> = report
        .entries()
        .iter()
        .map(|e| (e.table.as_deref(), e.discrepancy.kind()))
        .collect();
    assert_eq!(
        found,
        vec![
            (Some("invoices"), "table_not_found"),
            (Some("orders"), "row_not_found"),
            (Some("users"), "cell_mismatch"),
        ]
    );

    let text = err.to_string();
    assert!(text.contains("3 discrepancies"));
    assert!(text.contains("table \"invoices\": not exists in database"));
}

#[test]
fn test_invalid_fixture_aborts() {
    let file = snapshot_file();
    let source = JsonFileSource::new(file.path());

    let literals = tables(vec![("users", vec![row(&[("id", "=value > 0")])])]);
    let err = validate_literal_tables(&source, &literals, &SyncConfig::default()).unwrap_err();
    assert_eq!(err.code(), "TABSYNC_PRIMARY_KEY_EXPRESSION");
    assert!(err.report().is_none());

    let literals = tables(vec![("users", vec![row(&[("id", "1"), ("email", "x")])])]);
    let err = validate_literal_tables(&source, &literals, &SyncConfig::default()).unwrap_err();
    assert_eq!(err.code(), "TABSYNC_UNKNOWN_COLUMN");
}

#[test]
fn test_unreadable_snapshot_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("missing.json"));

    let literals = tables(vec![("users", vec![row(&[("id", "1")])])]);
    let err = validate_literal_tables(&source, &literals, &SyncConfig::default()).unwrap_err();
    assert!(matches!(err, SyncError::Source(_)));
    assert_eq!(err.code(), "TABSYNC_SOURCE_UNAVAILABLE");
}

// =============================================================================
// PREBUILT EXPECTATIONS AND CONFIG
// =============================================================================

#[test]
fn test_prebuilt_expectations_with_config_file() {
    let mut config_file = NamedTempFile::new().unwrap();
    config_file
        .write_all(br#"{"dump_timeout_ms": 5000, "nulls_first": true, "log_level": "warn"}"#)
        .unwrap();
    let config = SyncConfig::load(config_file.path()).unwrap();
    assert!(config.nulls_first);

    let schema = TableSchema::new(
        vec!["code".to_string()],
        vec![ColumnType::new("code", "text").nullable()],
    );
    let dump = TableDump::new(
        schema,
        vec![
            BTreeMap::from([("code".to_string(), ScalarValue::from("x"))]),
            BTreeMap::from([("code".to_string(), ScalarValue::Null)]),
        ],
    );
    let source = MemorySource::new(BTreeMap::new()).with_table("codes", dump);

    let mut expected = TableExpectations::new();
    expected.insert(
        "codes".to_string(),
        vec![
            ExpectedRow::new().with("code", ConstantValidator::new(ScalarValue::Null)),
            ExpectedRow::new().with("code", ConstantValidator::new(ScalarValue::from("x"))),
        ],
    );

    validate_tables(&source, &expected, &config).unwrap();
}

// =============================================================================
// FLUSH
// =============================================================================

#[test]
fn test_flush_raw_resolves_before_reaching_the_source() {
    let file = snapshot_file();
    let source = JsonFileSource::new(file.path());
    let config = SyncConfig::default();

    let missing = tables(vec![("invoices", vec![row(&[("id", "1")])])]);
    let err = flush_raw(&source, &missing, &config).unwrap_err();
    assert!(matches!(err, SyncError::TableNotFound(ref t) if t == "invoices"));

    let invalid = tables(vec![("users", vec![row(&[("id", "one")])])]);
    let err = flush_raw(&source, &invalid, &config).unwrap_err();
    assert_eq!(err.code(), "TABSYNC_INVALID_LITERAL");

    // values resolve, then the file source refuses to write
    let valid = tables(vec![("users", vec![row(&[("id", "=1 + 2"), ("name", "c")])])]);
    let err = flush_raw(&source, &valid, &config).unwrap_err();
    assert_eq!(err.code(), "TABSYNC_NOT_IMPLEMENTED");
}

#[test]
fn test_csv_fixtures_are_not_supported() {
    let source = MemorySource::new(BTreeMap::new());
    let err = flush_csv(&source, &BTreeMap::new()).unwrap_err();
    assert_eq!(err.code(), "TABSYNC_NOT_IMPLEMENTED");
}
