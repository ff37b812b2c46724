//! Predicate language errors

use thiserror::Error;

/// Result type for expression operations
pub type ExprResult<T> = Result<T, ExprError>;

/// Errors raised while compiling or evaluating a predicate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Invalid character or malformed literal
    #[error("syntax error at {position}: {message}")]
    Lex { position: usize, message: String },

    /// Token stream does not form an expression
    #[error("parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    /// Name not present in the environment
    #[error("unknown name: {0}")]
    UnknownName(String),

    /// Operand kinds do not fit the operator
    #[error("type error: {0}")]
    Type(String),

    /// Pattern given to `matches` does not compile
    #[error("invalid regex {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },

    /// Runtime failure (overflow, division by zero, unbound name)
    #[error("evaluation error: {0}")]
    Eval(String),
}

impl ExprError {
    pub(crate) fn lex(position: usize, message: impl Into<String>) -> Self {
        ExprError::Lex {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        ExprError::Parse {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ExprError::Type(message.into())
    }

    pub(crate) fn eval(message: impl Into<String>) -> Self {
        ExprError::Eval(message.into())
    }
}
