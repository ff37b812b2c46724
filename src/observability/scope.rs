//! Begin/complete logging around one operation
//!
//! `{name}_BEGIN` is logged on creation. Closing the scope logs
//! `{name}_COMPLETE` or `{name}_FAILED` with an `elapsed_ms` field; a scope
//! dropped without being closed logs `{name}_INCOMPLETE`.

use std::time::Instant;

use super::logger::{LogLevel, Logger};

/// ```ignore
/// let scope = ObservationScope::with_fields("VALIDATE_TABLES", &[("tables", "3")]);
/// match run() {
///     Ok(()) => scope.complete(),
///     Err(e) => scope.fail_fatal(&e.to_string()),
/// }
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    fields: Vec<(&'a str, String)>,
    started: Instant,
    closed: bool,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Scope whose fields are repeated on the closing event
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
            closed: false,
        }
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        self.close("COMPLETE", LogLevel::Info, extra);
    }

    /// Logs `{name}_FAILED` at FATAL level
    pub fn fail_fatal(mut self, reason: &str) {
        self.close("FAILED", LogLevel::Fatal, &[("reason", reason)]);
    }

    fn close(&mut self, suffix: &str, level: LogLevel, extra: &[(&str, &str)]) {
        self.closed = true;

        let elapsed = self.started.elapsed().as_millis().to_string();
        let mut fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        fields.extend_from_slice(extra);
        fields.push(("elapsed_ms", elapsed.as_str()));

        Logger::log(level, &format!("{}_{}", self.name, suffix), &fields);
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.closed {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
