//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, written to stderr so stdout stays free for command output
//! - Lines below the process-wide minimum level are dropped

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Per-row detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Discrepancies and recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Configuration errors and internal defects
    Fatal = 4,
}

impl LogLevel {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Fatal,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            other => Err(format!("unknown log level {:?}", other)),
        }
    }
}

static MIN_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Sets the minimum level written by every logger call
    pub fn set_min_level(level: LogLevel) {
        MIN_LEVEL.store(level as u8, Ordering::Relaxed);
    }

    pub fn min_level() -> LogLevel {
        LogLevel::from_u8(MIN_LEVEL.load(Ordering::Relaxed))
    }

    pub fn enabled(level: LogLevel) -> bool {
        level >= Self::min_level()
    }

    /// Log an event with the given level and fields
    pub fn log(level: LogLevel, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(level) {
            return;
        }

        #[cfg(test)]
        {
            let captured = CAPTURE.with(|c| match c.borrow_mut().as_mut() {
                Some(buffer) => {
                    Self::log_to_writer(level, event, fields, buffer);
                    true
                }
                None => false,
            });
            if captured {
                return;
            }
        }

        Self::log_to_writer(level, event, fields, &mut io::stderr());
    }

    fn log_to_writer<W: Write>(
        level: LogLevel,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut output = String::with_capacity(256);

        output.push('{');
        output.push_str("\"event\":\"");
        escape_json_string(&mut output, event);
        output.push_str("\",\"severity\":\"");
        output.push_str(level.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            escape_json_string(&mut output, key);
            output.push_str("\":\"");
            escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push_str("}\n");

        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Error, event, fields);
    }

    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(LogLevel::Fatal, event, fields);
    }
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}

#[cfg(test)]
thread_local! {
    static CAPTURE: std::cell::RefCell<Option<Vec<u8>>> = const { std::cell::RefCell::new(None) };
}

/// Runs `f` with this thread's log lines redirected into the returned list
#[cfg(test)]
pub fn capture_log(f: impl FnOnce()) -> Vec<String> {
    CAPTURE.with(|c| *c.borrow_mut() = Some(Vec::new()));
    f();
    let buffer = CAPTURE.with(|c| c.borrow_mut().take()).unwrap_or_default();
    String::from_utf8(buffer)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
fn render(level: LogLevel, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(level, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_and_parsing() {
        assert!(LogLevel::Trace < LogLevel::Info);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_json_format() {
        let output = render(LogLevel::Info, "RECONCILE_BEGIN", &[("table", "users")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "RECONCILE_BEGIN");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["table"], "users");
        assert_eq!(output.matches('\n').count(), 1);
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let a = render(LogLevel::Info, "E", &[("zebra", "1"), ("apple", "2")]);
        let b = render(LogLevel::Info, "E", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
    }

    #[test]
    fn test_capture_respects_min_level() {
        let lines = capture_log(|| {
            Logger::trace("HIDDEN", &[]);
            Logger::error("SHOWN", &[("code", "X")]);
        });
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("SHOWN"));
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let output = render(LogLevel::Warn, "E", &[("detail", "got \"b\"\n\u{1}")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["detail"], "got \"b\"\n\u{1}");
    }
}
