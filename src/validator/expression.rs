//! Expression validator
//!
//! The predicate sees two names:
//! - `value`: the candidate cell value
//! - `type`: the declared type name, without the nullable marker
//!
//! Compilation, type checking and one probe evaluation happen in `new`, so a
//! broken predicate fails while fixtures are being loaded instead of on the
//! first row.

use super::errors::{Mismatch, ValidationError, ValidatorError, ValidatorResult};
use super::Validator;
use crate::coercion::DeclaredType;
use crate::expr::{Bindings, Environment, ExpressionEngine, Program};
use crate::value::{ScalarKind, ScalarValue};

/// Name the candidate value is bound to
pub const VALUE_BINDING: &str = "value";

/// Name the declared type name is bound to
pub const TYPE_BINDING: &str = "type";

/// Validates a cell with a compiled boolean predicate
#[derive(Debug)]
pub struct ExpressionValidator {
    declared: DeclaredType,
    program: Box<dyn Program>,
}

impl ExpressionValidator {
    /// Compiles `source` for a column of type `declared`.
    ///
    /// # Errors
    ///
    /// - `TABSYNC_EXPRESSION_INVALID` if compilation, type checking or the
    ///   probe evaluation fails
    /// - `TABSYNC_EXPRESSION_NOT_BOOLEAN` if the predicate is not boolean
    pub fn new(
        engine: &dyn ExpressionEngine,
        declared: DeclaredType,
        source: &str,
    ) -> ValidatorResult<Self> {
        let env = Environment::new()
            .with(VALUE_BINDING, declared.kind())
            .with(TYPE_BINDING, ScalarKind::String);

        let program = engine
            .compile(source, &env)
            .map_err(|e| ValidatorError::expression_invalid(source, &e))?;

        if program.result_kind() != ScalarKind::Bool {
            return Err(ValidatorError::expression_not_boolean(
                source,
                program.result_kind(),
            ));
        }

        let probe = bindings(&declared, declared.zero());
        match program.run(&probe) {
            Ok(ScalarValue::Bool(_)) => {}
            Ok(other) => {
                return Err(ValidatorError::expression_not_boolean(source, other.kind()))
            }
            Err(e) => return Err(ValidatorError::expression_invalid(source, &e)),
        }

        Ok(Self { declared, program })
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared
    }

    /// Predicate source text, without the `=` prefix
    pub fn source(&self) -> &str {
        self.program.source()
    }
}

fn bindings(declared: &DeclaredType, value: ScalarValue) -> Bindings {
    Bindings::new()
        .bind(VALUE_BINDING, value)
        .bind(TYPE_BINDING, ScalarValue::from(declared.name()))
}

impl Validator for ExpressionValidator {
    fn validate(&self, actual: &ScalarValue) -> Result<(), ValidationError> {
        if actual.is_null() {
            if !self.declared.is_nullable() {
                return Err(Mismatch::UnexpectedNull.into());
            }
        } else if actual.kind() != self.declared.kind() {
            return Err(Mismatch::TypeMismatch {
                expected: self.declared.kind(),
                actual: actual.kind(),
            }
            .into());
        }

        let result = self
            .program
            .run(&bindings(&self.declared, actual.clone()))
            .map_err(|e| {
                ValidationError::Internal(format!(
                    "expression {:?} failed on {}: {}",
                    self.source(),
                    actual,
                    e
                ))
            })?;

        match result {
            ScalarValue::Bool(true) => Ok(()),
            ScalarValue::Bool(false) => Err(Mismatch::PredicateFailed {
                actual: actual.clone(),
                predicate: self.source().to_string(),
            }
            .into()),
            other => Err(ValidationError::Internal(format!(
                "expression {:?} returned {}, not bool",
                self.source(),
                other.kind()
            ))),
        }
    }

    fn as_constant(&self) -> Option<&ScalarValue> {
        None
    }
}
