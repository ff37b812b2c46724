//! Constant validator

use super::errors::{Mismatch, ValidationError};
use super::Validator;
use crate::value::ScalarValue;

/// Matches a cell by structural identity with a stored value
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantValidator {
    value: ScalarValue,
}

impl ConstantValidator {
    pub fn new(value: ScalarValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }
}

impl Validator for ConstantValidator {
    fn validate(&self, actual: &ScalarValue) -> Result<(), ValidationError> {
        if actual == &self.value {
            return Ok(());
        }

        let (expected_kind, actual_kind) = (self.value.kind(), actual.kind());
        if expected_kind != actual_kind && !self.value.is_null() && !actual.is_null() {
            return Err(Mismatch::TypeMismatch {
                expected: expected_kind,
                actual: actual_kind,
            }
            .into());
        }

        Err(Mismatch::ValueMismatch {
            expected: self.value.clone(),
            actual: actual.clone(),
        }
        .into())
    }

    fn as_constant(&self) -> Option<&ScalarValue> {
        Some(&self.value)
    }
}
