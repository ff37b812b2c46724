//! Validator construction from fixture literals

use std::fmt;
use std::sync::Arc;

use super::constant::ConstantValidator;
use super::errors::{ValidatorError, ValidatorResult};
use super::expression::ExpressionValidator;
use super::Validator;
use crate::coercion::DeclaredType;
use crate::expr::{Bindings, BuiltinEngine, Environment, ExpressionEngine};
use crate::value::ScalarValue;

/// Prefix marking a fixture literal as a predicate
pub const EXPRESSION_PREFIX: char = '=';

/// Builds validators for the columns of one table.
///
/// The factory knows the table's primary keys and refuses predicates on
/// them.
#[derive(Clone)]
pub struct ValidatorFactory {
    primary_keys: Vec<String>,
    engine: Arc<dyn ExpressionEngine>,
}

impl ValidatorFactory {
    /// Factory using the built-in predicate language
    pub fn new(primary_keys: Vec<String>) -> Self {
        Self::with_engine(primary_keys, Arc::new(BuiltinEngine::new()))
    }

    pub fn with_engine(primary_keys: Vec<String>, engine: Arc<dyn ExpressionEngine>) -> Self {
        Self {
            primary_keys,
            engine,
        }
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys.iter().any(|k| k == column)
    }

    /// Builds the validator for `literal` in `column` of type `declared`.
    ///
    /// # Errors
    ///
    /// All errors are FATAL configuration errors:
    /// - `TABSYNC_UNKNOWN_TYPE`, `TABSYNC_INVALID_LITERAL`
    /// - `TABSYNC_PRIMARY_KEY_EXPRESSION`
    /// - `TABSYNC_EXPRESSION_INVALID`, `TABSYNC_EXPRESSION_NOT_BOOLEAN`
    pub fn build(
        &self,
        column: &str,
        declared: &str,
        literal: &str,
    ) -> ValidatorResult<Box<dyn Validator>> {
        let declared = DeclaredType::parse(declared)?;

        let Some(source) = literal.strip_prefix(EXPRESSION_PREFIX) else {
            let value = declared.coerce(literal)?;
            return Ok(Box::new(ConstantValidator::new(value)));
        };

        if self.is_primary_key(column) {
            return Err(ValidatorError::primary_key_expression(column, literal));
        }

        let validator = ExpressionValidator::new(self.engine.as_ref(), declared, source)?;
        Ok(Box::new(validator))
    }
}

impl fmt::Debug for ValidatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorFactory")
            .field("primary_keys", &self.primary_keys)
            .finish_non_exhaustive()
    }
}

/// Resolves an insert-fixture literal to a concrete value.
///
/// A `=`-prefixed literal is evaluated with no names bound and its textual
/// result is coerced to `declared`; anything else is coerced directly.
pub fn resolve_value(
    engine: &dyn ExpressionEngine,
    declared: &str,
    literal: &str,
) -> ValidatorResult<ScalarValue> {
    let declared = DeclaredType::parse(declared)?;

    let Some(source) = literal.strip_prefix(EXPRESSION_PREFIX) else {
        return Ok(declared.coerce(literal)?);
    };

    let value = engine
        .compile(source, &Environment::new())
        .and_then(|program| program.run(&Bindings::new()))
        .map_err(|e| ValidatorError::expression_invalid(source, &e))?;

    Ok(declared.coerce(&value.to_literal())?)
}
