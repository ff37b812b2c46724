//! CLI command implementations
//!
//! Each command builds one JSON response; `run_command` prints it and turns
//! a non-ok response into a non-zero exit.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::config::SyncConfig;
use crate::observability::{Event, Logger};
use crate::source::JsonFileSource;
use crate::sync::{validate_literal_tables, LiteralRow, LiteralTables, SyncError};
use crate::validator::{ValidationError, ValidatorFactory};
use crate::value::ScalarValue;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{error_response, is_ok, ok_response, report_response, write_json};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a command and print its response
pub fn run_command(command: Command) -> CliResult<()> {
    let response = match command {
        Command::Check {
            snapshot,
            expect,
            config,
        } => check(&snapshot, &expect, config.as_deref())?,
        Command::Eval {
            declared,
            literal,
            value,
        } => eval(&declared, &literal, &value)?,
    };

    write_json(&response)?;

    if is_ok(&response) {
        Ok(())
    } else {
        let code = response["code"].as_str().unwrap_or_default();
        Err(CliError::CheckFailed(code.to_string()))
    }
}

/// Load the configuration (defaults when no path) and apply its log level
pub fn load_config(path: Option<&Path>) -> CliResult<SyncConfig> {
    let config = match path {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };

    Logger::set_min_level(config.log_level()?);
    if let Some(path) = path {
        let path = path.display().to_string();
        Event::ConfigLoaded.emit(&[("path", path.as_str())]);
    }

    Ok(config)
}

/// Reconcile the snapshot file against the expectations file
pub fn check(snapshot: &Path, expect: &Path, config: Option<&Path>) -> CliResult<Value> {
    let config = load_config(config)?;
    let literals = read_expectations(expect)?;
    let source = JsonFileSource::new(snapshot);

    let response = match validate_literal_tables(&source, &literals, &config) {
        Ok(()) => ok_response(json!({ "tables": literals.len() })),
        Err(SyncError::Mismatch(report)) => report_response("TABSYNC_SNAPSHOT_MISMATCH", &report),
        Err(e) => error_response(e.code(), &e.to_string()),
    };

    Ok(response)
}

/// Validate one JSON value against one fixture literal
pub fn eval(declared: &str, literal: &str, value: &str) -> CliResult<Value> {
    let actual = parse_value(value)?;

    // `eval` has no table, so no column is a primary key
    let validator = match ValidatorFactory::new(Vec::new()).build("value", declared, literal) {
        Ok(validator) => validator,
        Err(e) => return Ok(error_response(e.code().code(), e.message())),
    };

    let response = match validator.validate(&actual) {
        Ok(()) => ok_response(json!({
            "constant": validator.as_constant().is_some(),
            "value": actual.to_string()
        })),
        Err(ValidationError::Mismatch(mismatch)) => {
            error_response("TABSYNC_VALUE_MISMATCH", &mismatch.to_string())
        }
        Err(ValidationError::Internal(message)) => {
            error_response("TABSYNC_INTERNAL_DEFECT", &message)
        }
    };

    Ok(response)
}

/// Reads `{table: [{column: literal}]}`; scalar JSON literals are
/// stringified
pub fn read_expectations(path: &Path) -> CliResult<LiteralTables> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&content)?;

    let Value::Object(tables) = document else {
        return Err(CliError::input("expectations must be a JSON object"));
    };

    let mut literals = LiteralTables::new();
    for (table, rows) in tables {
        let Value::Array(rows) = rows else {
            return Err(CliError::input(format!(
                "table {:?}: expected a list of rows",
                table
            )));
        };

        let mut parsed = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(cells) = row else {
                return Err(CliError::input(format!(
                    "table {:?}: every row must be an object",
                    table
                )));
            };

            let mut literal_row = LiteralRow::new();
            for (column, cell) in cells {
                let literal = literal_text(&cell).ok_or_else(|| {
                    CliError::input(format!(
                        "table {:?}, column {:?}: literal must be a scalar",
                        table, column
                    ))
                })?;
                literal_row.insert(column, literal);
            }
            parsed.push(literal_row);
        }
        literals.insert(table, parsed);
    }

    Ok(literals)
}

fn literal_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Accepts a tagged `ScalarValue` object or a plain JSON scalar
fn parse_value(text: &str) -> CliResult<ScalarValue> {
    let value = match serde_json::from_str::<Value>(text)? {
        Value::Null => ScalarValue::Null,
        Value::Bool(b) => ScalarValue::Bool(b),
        Value::String(s) => ScalarValue::String(s),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ScalarValue::Integer(i),
            None => n
                .as_f64()
                .map(ScalarValue::Float)
                .ok_or_else(|| CliError::input(format!("number {} out of range", n)))?,
        },
        tagged @ Value::Object(_) => serde_json::from_value(tagged)
            .map_err(|e| CliError::input(format!("invalid tagged value: {}", e)))?,
        Value::Array(_) => return Err(CliError::input("value must be a JSON scalar")),
    };

    Ok(value)
}
