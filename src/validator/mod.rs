//! Cell validators
//!
//! A validator is the expectation for one cell of one expected row. It is
//! built once from a fixture literal and then used read-only:
//!
//! - constant: the literal coerced to the column's declared type, matched
//!   by structural identity
//! - expression: a `=`-prefixed predicate compiled against `{value, type}`
//!   and checked eagerly at construction
//!
//! Primary-key columns only accept constants, so that expected rows can be
//! located in a snapshot without evaluating anything.

mod constant;
mod errors;
mod expression;
mod factory;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

pub use constant::ConstantValidator;
pub use errors::{
    Mismatch, ValidationError, ValidatorError, ValidatorErrorCode, ValidatorResult,
};
pub use expression::ExpressionValidator;
pub use factory::{resolve_value, ValidatorFactory, EXPRESSION_PREFIX};

use crate::value::ScalarValue;

/// Expectation for a single cell
pub trait Validator: fmt::Debug + Send + Sync {
    /// Checks an actual cell value against the expectation.
    fn validate(&self, actual: &ScalarValue) -> Result<(), ValidationError>;

    /// Returns the expected value when the expectation is a plain constant.
    fn as_constant(&self) -> Option<&ScalarValue>;
}

/// Expected row: column name to validator
#[derive(Debug, Default)]
pub struct ExpectedRow {
    cells: BTreeMap<String, Box<dyn Validator>>,
}

impl ExpectedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`
    pub fn with(mut self, column: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.cells.insert(column.into(), Box::new(validator));
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, validator: Box<dyn Validator>) {
        self.cells.insert(column.into(), validator);
    }

    pub fn get(&self, column: &str) -> Option<&dyn Validator> {
        self.cells.get(column).map(|v| v.as_ref())
    }

    /// Iterates cells in column-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Validator)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl IntoIterator for ExpectedRow {
    type Item = (String, Box<dyn Validator>);
    type IntoIter = btree_map::IntoIter<String, Box<dyn Validator>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl FromIterator<(String, Box<dyn Validator>)> for ExpectedRow {
    fn from_iter<I: IntoIterator<Item = (String, Box<dyn Validator>)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_row_lookup() {
        let row = ExpectedRow::new()
            .with("id", ConstantValidator::new(ScalarValue::Integer(1)))
            .with("name", ConstantValidator::new(ScalarValue::from("a")));

        assert_eq!(row.len(), 2);
        assert_eq!(
            row.get("id").and_then(|v| v.as_constant()),
            Some(&ScalarValue::Integer(1))
        );
        assert!(row.get("missing").is_none());

        let columns: Vec<&str> = row.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["id", "name"]);
    }
}
