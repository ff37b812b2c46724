//! JSON output for the CLI
//!
//! Every command prints exactly one JSON object on stdout. Logs go to
//! stderr.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::CliResult;
use crate::reconcile::ReconcileReport;

/// `{"status": "ok", "data": ...}`
pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// `{"status": "error", "code": ..., "message": ...}`
pub fn error_response(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Error response listing every discrepancy of `report`
pub fn report_response(code: &str, report: &ReconcileReport) -> Value {
    let discrepancies: Vec<Value> = report
        .entries()
        .iter()
        .map(|entry| {
            json!({
                "table": entry.table,
                "kind": entry.discrepancy.kind(),
                "message": entry.discrepancy.to_string()
            })
        })
        .collect();

    json!({
        "status": "error",
        "code": code,
        "discrepancies": discrepancies
    })
}

/// True for responses built by `ok_response`
pub fn is_ok(response: &Value) -> bool {
    response["status"] == "ok"
}

/// Write one JSON object to stdout
pub fn write_json(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
