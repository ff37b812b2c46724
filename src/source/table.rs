//! Dumped table data

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::TableSchema;
use crate::value::ScalarValue;

/// One dumped row: column name to value
pub type TableRow = BTreeMap<String, ScalarValue>;

/// Read-only snapshot of one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDump {
    pub schema: TableSchema,
    /// Rows in the order the source returned them
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl TableDump {
    pub fn new(schema: TableSchema, rows: Vec<TableRow>) -> Self {
        Self { schema, rows }
    }
}

/// Every table of a database, keyed by table name
pub type Snapshot = BTreeMap<String, TableDump>;
