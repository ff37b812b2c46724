//! Shared error severity
//!
//! Every subsystem error carries a code and a severity:
//! - ERROR: recoverable, aggregated into a report
//! - FATAL: aborts the whole operation

use std::fmt;

/// Severity levels shared by all tabsync error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A discrepancy that is collected and reported
    Error,
    /// Configuration error or internal defect, the operation stops
    Fatal,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Fatal.to_string(), "FATAL");
    }
}
