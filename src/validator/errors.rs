//! Validator error types
//!
//! Construction errors (all FATAL):
//! - TABSYNC_EXPRESSION_INVALID
//! - TABSYNC_EXPRESSION_NOT_BOOLEAN
//! - TABSYNC_PRIMARY_KEY_EXPRESSION
//! - TABSYNC_UNKNOWN_COLUMN
//! - TABSYNC_UNKNOWN_TYPE / TABSYNC_INVALID_LITERAL (from coercion)
//!
//! Row validation produces a `Mismatch` (recoverable) or, when a compiled
//! predicate misbehaves at run time, an internal defect.

use std::fmt;

use thiserror::Error;

use crate::coercion::CoercionError;
use crate::errors::Severity;
use crate::expr::ExprError;
use crate::value::{ScalarKind, ScalarValue};

/// Validator construction error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorErrorCode {
    /// Declared type unknown
    UnknownType,
    /// Literal does not parse as the declared type
    InvalidLiteral,
    /// Predicate fails to compile, type-check or evaluate
    ExpressionInvalid,
    /// Predicate does not yield a boolean
    ExpressionNotBoolean,
    /// Predicate assigned to a primary-key column
    PrimaryKeyExpression,
    /// Column has no declared type in the table schema
    UnknownColumn,
}

impl ValidatorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidatorErrorCode::UnknownType => "TABSYNC_UNKNOWN_TYPE",
            ValidatorErrorCode::InvalidLiteral => "TABSYNC_INVALID_LITERAL",
            ValidatorErrorCode::ExpressionInvalid => "TABSYNC_EXPRESSION_INVALID",
            ValidatorErrorCode::ExpressionNotBoolean => "TABSYNC_EXPRESSION_NOT_BOOLEAN",
            ValidatorErrorCode::PrimaryKeyExpression => "TABSYNC_PRIMARY_KEY_EXPRESSION",
            ValidatorErrorCode::UnknownColumn => "TABSYNC_UNKNOWN_COLUMN",
        }
    }

    /// Construction errors are configuration errors
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for ValidatorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error raised while building a validator from a fixture literal
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorError {
    code: ValidatorErrorCode,
    message: String,
}

impl ValidatorError {
    /// Predicate failed to compile or to evaluate against the probe value
    pub fn expression_invalid(source: &str, cause: &ExprError) -> Self {
        Self {
            code: ValidatorErrorCode::ExpressionInvalid,
            message: format!("expression {:?}: {}", source, cause),
        }
    }

    /// Predicate yields something other than a boolean
    pub fn expression_not_boolean(source: &str, kind: ScalarKind) -> Self {
        Self {
            code: ValidatorErrorCode::ExpressionNotBoolean,
            message: format!("expression {:?} returns {}, not bool", source, kind),
        }
    }

    /// Predicate given for a primary-key column
    pub fn primary_key_expression(column: &str, literal: &str) -> Self {
        Self {
            code: ValidatorErrorCode::PrimaryKeyExpression,
            message: format!(
                "found {:?} value for {:?} column: primary keys can't be expressions",
                literal, column
            ),
        }
    }

    /// Column not described by the table schema
    pub fn unknown_column(column: &str) -> Self {
        Self {
            code: ValidatorErrorCode::UnknownColumn,
            message: format!("column {:?} has no declared type", column),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ValidatorErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Prefixes the message with the column the literal belongs to
    pub fn in_column(mut self, column: &str) -> Self {
        self.message = format!("column {:?}: {}", column, self.message);
        self
    }
}

impl From<CoercionError> for ValidatorError {
    fn from(err: CoercionError) -> Self {
        use crate::coercion::CoercionErrorCode;

        let code = match err.code() {
            CoercionErrorCode::UnknownType => ValidatorErrorCode::UnknownType,
            CoercionErrorCode::InvalidLiteral => ValidatorErrorCode::InvalidLiteral,
        };
        Self {
            code,
            message: err.message().to_string(),
        }
    }
}

impl fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for ValidatorError {}

/// Result type for validator construction
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// A cell value that does not satisfy its expectation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Mismatch {
    /// Non-null value of the wrong kind
    #[error("mismatched types: got {actual}, want {expected}")]
    TypeMismatch {
        expected: ScalarKind,
        actual: ScalarKind,
    },

    /// Same kind, different payload (or NULL against a constant)
    #[error("mismatched values: got {actual}, want {expected}")]
    ValueMismatch {
        expected: ScalarValue,
        actual: ScalarValue,
    },

    /// NULL where the declaration is not nullable
    #[error("unexpected null value")]
    UnexpectedNull,

    /// Predicate evaluated to false
    #[error("on {actual} (type {}), fails this expression: {predicate}", .actual.kind())]
    PredicateFailed {
        actual: ScalarValue,
        predicate: String,
    },
}

/// Outcome of a failed `Validator::validate`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Data does not match the expectation
    #[error("{0}")]
    Mismatch(#[from] Mismatch),

    /// A compiled predicate failed at run time despite passing its
    /// construction-time checks
    #[error("internal defect: {0}")]
    Internal(String),
}

impl ValidationError {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, ValidationError::Mismatch(_))
    }
}
