//! Coercion error types
//!
//! Error codes:
//! - TABSYNC_UNKNOWN_TYPE (FATAL)
//! - TABSYNC_INVALID_LITERAL (FATAL)

use std::fmt;

use crate::errors::Severity;

/// Coercion error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionErrorCode {
    /// Declared type name is not supported
    UnknownType,
    /// Literal text cannot be converted to the declared type
    InvalidLiteral,
}

impl CoercionErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CoercionErrorCode::UnknownType => "TABSYNC_UNKNOWN_TYPE",
            CoercionErrorCode::InvalidLiteral => "TABSYNC_INVALID_LITERAL",
        }
    }

    /// Both codes are configuration errors
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for CoercionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Coercion error with context
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionError {
    code: CoercionErrorCode,
    message: String,
}

impl CoercionError {
    /// Create an unknown type error
    pub fn unknown_type(type_name: &str) -> Self {
        Self {
            code: CoercionErrorCode::UnknownType,
            message: format!("type {:?} not found", type_name),
        }
    }

    /// Create an invalid literal error
    pub fn invalid_literal(type_name: &str, literal: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: CoercionErrorCode::InvalidLiteral,
            message: format!("literal {:?} is not a valid {}: {}", literal, type_name, reason),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CoercionErrorCode {
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
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for CoercionError {}

/// Result type for coercion operations
pub type CoercionResult<T> = Result<T, CoercionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CoercionErrorCode::UnknownType.code(), "TABSYNC_UNKNOWN_TYPE");
        assert_eq!(CoercionErrorCode::InvalidLiteral.code(), "TABSYNC_INVALID_LITERAL");
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let err = CoercionError::unknown_type("jsonb");
        assert!(err.is_fatal());
        let display = err.to_string();
        assert!(display.contains("FATAL"));
        assert!(display.contains("jsonb"));
    }
}
