//! Scalar value representation

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single dynamically-typed cell value.
///
/// Two values are identical only if they carry the same tag and the same
/// payload. `Null` has no payload and is identical only to `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Null,
    Integer(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
    Timestamp(DateTime<Utc>),
}

/// The tag of a `ScalarValue`, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Null,
    Integer,
    Float,
    Bool,
    Bytes,
    String,
    Timestamp,
}

impl ScalarKind {
    /// Returns the kind name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Null => "null",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::Bytes => "bytes",
            ScalarKind::String => "string",
            ScalarKind::Timestamp => "timestamp",
        }
    }

    /// Returns true for `Integer` and `Float`
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarKind::Integer | ScalarKind::Float)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ScalarValue {
    /// Returns the tag of this value
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Null => ScalarKind::Null,
            ScalarValue::Integer(_) => ScalarKind::Integer,
            ScalarValue::Float(_) => ScalarKind::Float,
            ScalarValue::Bool(_) => ScalarKind::Bool,
            ScalarValue::Bytes(_) => ScalarKind::Bytes,
            ScalarValue::String(_) => ScalarKind::String,
            ScalarValue::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Returns the numeric payload widened to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Integer(i) => Some(*i as f64),
            ScalarValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Renders the value as fixture literal text.
    ///
    /// This is the text a literal must contain for `coerce` to produce
    /// the same value back, given a matching declared type.
    pub fn to_literal(&self) -> String {
        match self {
            ScalarValue::Null => "null".to_string(),
            ScalarValue::Integer(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            ScalarValue::String(s) => s.clone(),
            ScalarValue::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "NULL"),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(v) => write!(f, "{:?}", v),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Bytes(bytes) => {
                write!(f, "0x")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            ScalarValue::String(s) => write!(f, "{:?}", s),
            ScalarValue::Timestamp(t) => {
                write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Integer(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::String(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::String(v)
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(v: Vec<u8>) -> Self {
        ScalarValue::Bytes(v)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(v: DateTime<Utc>) -> Self {
        ScalarValue::Timestamp(v)
    }
}

/// Coerces a value into a boolean using the truthy-parsing rule.
///
/// Accepted inputs:
/// - `Bool` as is
/// - numeric `0` / `1`
/// - strings and bytes spelling `true`/`false` (any case), `t`/`f`, `1`/`0`
///
/// Everything else (including `Null` and timestamps) is not coercible.
pub fn coerce_bool(value: &ScalarValue) -> Option<bool> {
    match value {
        ScalarValue::Bool(b) => Some(*b),
        ScalarValue::Integer(0) => Some(false),
        ScalarValue::Integer(1) => Some(true),
        ScalarValue::Float(f) if *f == 0.0 => Some(false),
        ScalarValue::Float(f) if *f == 1.0 => Some(true),
        ScalarValue::String(s) => parse_bool_text(s),
        ScalarValue::Bytes(b) => std::str::from_utf8(b).ok().and_then(parse_bool_text),
        _ => None,
    }
}

fn parse_bool_text(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("t") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text.eq_ignore_ascii_case("f") || text == "0" {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_of_each_variant() {
        assert_eq!(ScalarValue::Null.kind(), ScalarKind::Null);
        assert_eq!(ScalarValue::from(1i64).kind(), ScalarKind::Integer);
        assert_eq!(ScalarValue::from(1.5f64).kind(), ScalarKind::Float);
        assert_eq!(ScalarValue::from(true).kind(), ScalarKind::Bool);
        assert_eq!(ScalarValue::from(vec![1u8]).kind(), ScalarKind::Bytes);
        assert_eq!(ScalarValue::from("a").kind(), ScalarKind::String);
    }

    #[test]
    fn test_identity_requires_same_tag() {
        assert_ne!(ScalarValue::Integer(1), ScalarValue::Float(1.0));
        assert_ne!(ScalarValue::String("a".into()), ScalarValue::Bytes(b"a".to_vec()));
        assert_eq!(ScalarValue::Null, ScalarValue::Null);
    }

    #[test]
    fn test_coerce_bool_truthy_rules() {
        assert_eq!(coerce_bool(&ScalarValue::Integer(1)), Some(true));
        assert_eq!(coerce_bool(&ScalarValue::Integer(0)), Some(false));
        assert_eq!(coerce_bool(&ScalarValue::Integer(2)), None);
        assert_eq!(coerce_bool(&ScalarValue::from("TRUE")), Some(true));
        assert_eq!(coerce_bool(&ScalarValue::from("False")), Some(false));
        assert_eq!(coerce_bool(&ScalarValue::from("yes")), None);
        assert_eq!(coerce_bool(&ScalarValue::Bytes(b"true".to_vec())), Some(true));
        assert_eq!(coerce_bool(&ScalarValue::Null), None);
    }

    #[test]
    fn test_display_for_diagnostics() {
        assert_eq!(ScalarValue::Null.to_string(), "NULL");
        assert_eq!(ScalarValue::from("b").to_string(), "\"b\"");
        assert_eq!(ScalarValue::Bytes(vec![0xde, 0xad]).to_string(), "0xdead");
        assert_eq!(ScalarValue::Float(2.0).to_string(), "2.0");
    }

    #[test]
    fn test_to_literal() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(ScalarValue::Timestamp(ts).to_literal(), "2024-01-02T03:04:05Z");
        assert_eq!(ScalarValue::from("x").to_literal(), "x");
        assert_eq!(ScalarValue::Null.to_literal(), "null");
    }

    #[test]
    fn test_serde_externally_tagged() {
        let json = serde_json::to_string(&ScalarValue::Integer(7)).unwrap();
        assert_eq!(json, r#"{"Integer":7}"#);
        let back: ScalarValue = serde_json::from_str(r#""Null""#).unwrap();
        assert_eq!(back, ScalarValue::Null);
    }
}
