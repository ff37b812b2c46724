//! Table schema metadata reported by a data source

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coercion::NULLABLE_MARKER;

/// Catalog marker for columns whose real type is in `udt_name`
pub const USER_DEFINED: &str = "USER-DEFINED";

/// One column's catalog type information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub name: String,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udt_name: Option<String>,
    /// Catalog `is_nullable`
    #[serde(default)]
    pub is_nullable: bool,
}

impl ColumnType {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            udt_name: None,
            is_nullable: false,
        }
    }

    /// A user-defined column aliasing `udt_name`
    pub fn user_defined(name: impl Into<String>, udt_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: USER_DEFINED.to_string(),
            udt_name: Some(udt_name.into()),
            is_nullable: false,
        }
    }

    /// Marks the column as accepting NULL
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Declared type name, with user-defined aliases resolved
    pub fn resolved_type(&self) -> &str {
        match (&self.udt_name, self.data_type.as_str()) {
            (Some(udt), USER_DEFINED) => udt,
            _ => &self.data_type,
        }
    }

    /// Resolved type name, prefixed with the nullable marker when the
    /// column accepts NULL
    pub fn declared_type(&self) -> Cow<'_, str> {
        let resolved = self.resolved_type();
        if self.is_nullable && !resolved.starts_with(NULLABLE_MARKER) {
            Cow::Owned(format!("{}{}", NULLABLE_MARKER, resolved))
        } else {
            Cow::Borrowed(resolved)
        }
    }
}

/// Primary keys and column types of one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Primary-key columns in declaration order
    pub primary_keys: Vec<String>,
    /// Columns in ordinal order
    #[serde(default)]
    pub columns: Vec<ColumnType>,
}

impl TableSchema {
    pub fn new(primary_keys: Vec<String>, columns: Vec<ColumnType>) -> Self {
        Self {
            primary_keys,
            columns,
        }
    }

    /// Column name to resolved declared type name
    pub fn type_map(&self) -> BTreeMap<&str, &str> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.resolved_type()))
            .collect()
    }

    pub fn column_type(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.resolved_type())
    }

    /// Type a fixture literal for `column` is coerced to
    pub fn declared_type(&self, column: &str) -> Option<Cow<'_, str>> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.declared_type())
    }

    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys.iter().any(|k| k == column)
    }
}
