//! Data source error types
//!
//! Every source error aborts the operation that requested the dump or
//! flush:
//! - TABSYNC_SOURCE_UNAVAILABLE (FATAL)
//! - TABSYNC_SOURCE_TIMEOUT (FATAL)
//! - TABSYNC_SOURCE_DECODE (FATAL)
//! - TABSYNC_NOT_IMPLEMENTED (FATAL)

use std::fmt;
use std::time::Duration;

use crate::errors::Severity;

/// Data source error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorCode {
    /// Source could not be reached or read
    Unavailable,
    /// Dump did not finish within the deadline
    Timeout,
    /// Snapshot payload is malformed
    Decode,
    /// Operation is not provided by this source
    NotImplemented,
}

impl SourceErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SourceErrorCode::Unavailable => "TABSYNC_SOURCE_UNAVAILABLE",
            SourceErrorCode::Timeout => "TABSYNC_SOURCE_TIMEOUT",
            SourceErrorCode::Decode => "TABSYNC_SOURCE_DECODE",
            SourceErrorCode::NotImplemented => "TABSYNC_NOT_IMPLEMENTED",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error raised by a data source
#[derive(Debug)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: SourceErrorCode::Unavailable,
            message: message.into(),
            source: None,
        }
    }

    pub fn timeout(elapsed: Duration, deadline: Duration) -> Self {
        Self {
            code: SourceErrorCode::Timeout,
            message: format!(
                "dump took {}ms, deadline is {}ms",
                elapsed.as_millis(),
                deadline.as_millis()
            ),
            source: None,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            code: SourceErrorCode::Decode,
            message: message.into(),
            source: None,
        }
    }

    /// Operation `what` is not implemented
    pub fn not_implemented(what: &str) -> Self {
        Self {
            code: SourceErrorCode::NotImplemented,
            message: format!("{} is not implemented", what),
            source: None,
        }
    }

    /// Attaches an underlying cause
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type for data source operations
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_not_implemented_display() {
        let err = SourceError::not_implemented("flush");
        assert_eq!(err.code().code(), "TABSYNC_NOT_IMPLEMENTED");
        assert_eq!(
            err.to_string(),
            "[FATAL] TABSYNC_NOT_IMPLEMENTED: flush is not implemented"
        );
    }

    #[test]
    fn test_source_chain() {
        let err = SourceError::unavailable("cannot open snapshot")
            .with_source(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.source().is_some());
        assert!(err.is_fatal());
    }
}
