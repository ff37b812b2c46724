//! Primary-key projections and the row comparators built on them

use std::cmp::Ordering;
use std::fmt;

use crate::source::TableRow;
use crate::validator::ExpectedRow;
use crate::value::{compare, NullPlacement, ScalarValue};

static NULL: ScalarValue = ScalarValue::Null;

/// Primary-key column values of one row, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct KeyProjection {
    columns: Vec<(String, ScalarValue)>,
}

impl KeyProjection {
    /// Projects a dumped row; absent key columns read as NULL
    pub fn of_row(row: &TableRow, keys: &[String]) -> Self {
        Self {
            columns: keys
                .iter()
                .map(|k| (k.clone(), cell(row, k).clone()))
                .collect(),
        }
    }

    pub fn columns(&self) -> &[(String, ScalarValue)] {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Option<&ScalarValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for KeyProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (column, value)) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", column, value)?;
        }
        write!(f, "}}")
    }
}

fn cell<'a>(row: &'a TableRow, column: &str) -> &'a ScalarValue {
    row.get(column).unwrap_or(&NULL)
}

/// Orders dumped rows by their key columns; first unequal column decides
pub fn compare_rows(a: &TableRow, b: &TableRow, keys: &[String], nulls: NullPlacement) -> Ordering {
    keys.iter()
        .map(|k| compare(cell(a, k), cell(b, k), nulls))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Orders a dumped row against a key projection built from the same keys
pub fn compare_row_to_key(row: &TableRow, key: &KeyProjection, nulls: NullPlacement) -> Ordering {
    key.columns
        .iter()
        .map(|(column, value)| compare(cell(row, column), value, nulls))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Projects an expected row through its key validators.
///
/// Fails with the key columns that have no validator or whose validator is
/// not a constant.
pub fn project_expected(row: &ExpectedRow, keys: &[String]) -> Result<KeyProjection, Vec<String>> {
    let mut columns = Vec::with_capacity(keys.len());
    let mut unresolved = Vec::new();

    for key in keys {
        match row.get(key).and_then(|v| v.as_constant()) {
            Some(value) => columns.push((key.clone(), value.clone())),
            None => unresolved.push(key.clone()),
        }
    }

    if unresolved.is_empty() {
        Ok(KeyProjection { columns })
    } else {
        Err(unresolved)
    }
}

/// Orders expected rows by their constant keys.
///
/// Rows whose keys are not all constants sort after every fully constant
/// row and compare equal among themselves.
pub fn compare_expected(
    a: &ExpectedRow,
    b: &ExpectedRow,
    keys: &[String],
    nulls: NullPlacement,
) -> Ordering {
    let constants = |row: &ExpectedRow| -> Option<Vec<ScalarValue>> {
        keys.iter()
            .map(|k| row.get(k).and_then(|v| v.as_constant()).cloned())
            .collect()
    };

    match (constants(a), constants(b)) {
        (Some(a), Some(b)) => a
            .iter()
            .zip(&b)
            .map(|(a, b)| compare(a, b, nulls))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{ConstantValidator, ValidatorFactory};

    fn row(id: i64, name: &str) -> TableRow {
        TableRow::from([
            ("id".to_string(), ScalarValue::Integer(id)),
            ("name".to_string(), ScalarValue::from(name)),
        ])
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compare_rows_by_composite_key() {
        let keys = keys(&["name", "id"]);
        let nulls = NullPlacement::Last;
        assert_eq!(compare_rows(&row(2, "a"), &row(1, "b"), &keys, nulls), Ordering::Less);
        assert_eq!(compare_rows(&row(1, "a"), &row(2, "a"), &keys, nulls), Ordering::Less);
        assert_eq!(compare_rows(&row(1, "a"), &row(1, "a"), &keys, nulls), Ordering::Equal);
    }

    #[test]
    fn test_missing_key_column_reads_as_null() {
        let keys = keys(&["id"]);
        let empty = TableRow::new();
        assert_eq!(
            compare_rows(&empty, &row(1, "a"), &keys, NullPlacement::Last),
            Ordering::Greater
        );
        assert_eq!(
            compare_rows(&empty, &row(1, "a"), &keys, NullPlacement::First),
            Ordering::Less
        );
    }

    #[test]
    fn test_projection_display_and_lookup() {
        let key = KeyProjection::of_row(&row(2, "b"), &keys(&["id", "name"]));
        assert_eq!(key.to_string(), "{id: 2, name: \"b\"}");
        assert_eq!(key.get("id"), Some(&ScalarValue::Integer(2)));
        assert_eq!(
            compare_row_to_key(&row(2, "b"), &key, NullPlacement::Last),
            Ordering::Equal
        );
    }

    #[test]
    fn test_project_expected_reports_unresolved_columns() {
        let factory = ValidatorFactory::new(vec![]);
        let mut expected = ExpectedRow::new();
        expected.insert("name", factory.build("name", "text", "=value != ''").unwrap());

        let err = project_expected(&expected, &keys(&["id", "name"])).unwrap_err();
        assert_eq!(err, keys(&["id", "name"]));
    }

    #[test]
    fn test_unresolved_expected_rows_sort_last() {
        let keys = keys(&["id"]);
        let constant = ExpectedRow::new().with("id", ConstantValidator::new(ScalarValue::Integer(9)));
        let missing = ExpectedRow::new().with("name", ConstantValidator::new(ScalarValue::from("x")));

        let nulls = NullPlacement::Last;
        assert_eq!(compare_expected(&constant, &missing, &keys, nulls), Ordering::Less);
        assert_eq!(compare_expected(&missing, &constant, &keys, nulls), Ordering::Greater);
        assert_eq!(compare_expected(&missing, &missing, &keys, nulls), Ordering::Equal);
    }
}
