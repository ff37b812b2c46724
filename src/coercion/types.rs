//! Declared column types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use super::errors::{CoercionError, CoercionResult};
use crate::value::{coerce_bool, ScalarKind, ScalarValue};

/// Prefix marking a declared type as nullable
pub const NULLABLE_MARKER: char = '?';

/// Underlying column type a declared type name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    /// text, varchar, char
    Text,
    /// Canonical textual identifier
    Uuid,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    Boolean,
    /// double precision, real, numeric
    Double,
    Timestamp,
}

impl BaseType {
    /// Resolves a type name (case-insensitive, surrounding whitespace ignored)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let base = match name.as_str() {
            "text" | "string" | "character varying" | "varchar" | "character" | "char" => {
                BaseType::Text
            }
            "uuid" => BaseType::Uuid,
            "smallint" | "int2" => BaseType::SmallInt,
            "integer" | "int" | "int4" => BaseType::Integer,
            "bigint" | "int8" => BaseType::BigInt,
            "boolean" | "bool" => BaseType::Boolean,
            "double precision" | "float8" | "real" | "float4" | "numeric" => BaseType::Double,
            "timestamp"
            | "timestamptz"
            | "timestamp with time zone"
            | "timestamp without time zone" => BaseType::Timestamp,
            _ => return None,
        };
        Some(base)
    }

    /// Returns the scalar tag that values of this type carry
    pub fn kind(&self) -> ScalarKind {
        match self {
            BaseType::Text | BaseType::Uuid => ScalarKind::String,
            BaseType::SmallInt | BaseType::Integer | BaseType::BigInt => ScalarKind::Integer,
            BaseType::Boolean => ScalarKind::Bool,
            BaseType::Double => ScalarKind::Float,
            BaseType::Timestamp => ScalarKind::Timestamp,
        }
    }

    /// Returns a zero-valued instance of this type
    pub fn zero(&self) -> ScalarValue {
        match self {
            BaseType::Text | BaseType::Uuid => ScalarValue::String(String::new()),
            BaseType::SmallInt | BaseType::Integer | BaseType::BigInt => ScalarValue::Integer(0),
            BaseType::Boolean => ScalarValue::Bool(false),
            BaseType::Double => ScalarValue::Float(0.0),
            BaseType::Timestamp => ScalarValue::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    fn integer_range(&self) -> (i64, i64) {
        match self {
            BaseType::SmallInt => (i16::MIN as i64, i16::MAX as i64),
            BaseType::Integer => (i32::MIN as i64, i32::MAX as i64),
            _ => (i64::MIN, i64::MAX),
        }
    }
}

/// A parsed declared type: base type plus nullability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    name: String,
    base: BaseType,
    nullable: bool,
}

impl DeclaredType {
    /// Parses a declared type name, honoring the nullable marker.
    ///
    /// # Errors
    ///
    /// Returns `TABSYNC_UNKNOWN_TYPE` if the name is not supported.
    pub fn parse(declared: &str) -> CoercionResult<Self> {
        let (nullable, name) = match declared.strip_prefix(NULLABLE_MARKER) {
            Some(rest) => (true, rest),
            None => (false, declared),
        };

        let base = BaseType::from_name(name).ok_or_else(|| CoercionError::unknown_type(name))?;

        Ok(Self {
            name: name.trim().to_string(),
            base,
            nullable,
        })
    }

    /// Type name without the nullable marker
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> BaseType {
        self.base
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Scalar tag expected for non-null values
    pub fn kind(&self) -> ScalarKind {
        self.base.kind()
    }

    /// Zero-valued probe instance
    pub fn zero(&self) -> ScalarValue {
        self.base.zero()
    }

    /// Converts literal text into a value of this type.
    pub fn coerce(&self, literal: &str) -> CoercionResult<ScalarValue> {
        if self.nullable && literal.eq_ignore_ascii_case("null") {
            return Ok(ScalarValue::Null);
        }

        match self.base {
            BaseType::Text => Ok(ScalarValue::String(literal.to_string())),
            BaseType::Uuid => Uuid::parse_str(literal.trim())
                .map(|id| ScalarValue::String(id.hyphenated().to_string()))
                .map_err(|e| CoercionError::invalid_literal(&self.name, literal, e)),
            BaseType::SmallInt | BaseType::Integer | BaseType::BigInt => {
                let value: i64 = literal
                    .trim()
                    .parse()
                    .map_err(|e| CoercionError::invalid_literal(&self.name, literal, e))?;
                let (min, max) = self.base.integer_range();
                if value < min || value > max {
                    return Err(CoercionError::invalid_literal(
                        &self.name,
                        literal,
                        format!("value out of range [{}, {}]", min, max),
                    ));
                }
                Ok(ScalarValue::Integer(value))
            }
            BaseType::Boolean => coerce_bool(&ScalarValue::String(literal.to_string()))
                .map(ScalarValue::Bool)
                .ok_or_else(|| {
                    CoercionError::invalid_literal(&self.name, literal, "expected true or false")
                }),
            BaseType::Double => literal
                .trim()
                .parse::<f64>()
                .map(ScalarValue::Float)
                .map_err(|e| CoercionError::invalid_literal(&self.name, literal, e)),
            BaseType::Timestamp => parse_timestamp(literal.trim())
                .map(ScalarValue::Timestamp)
                .ok_or_else(|| {
                    CoercionError::invalid_literal(&self.name, literal, "expected RFC 3339 timestamp")
                }),
        }
    }
}

/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS[.f]` form (read as UTC)
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl FromStr for DeclaredType {
    type Err = CoercionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}", NULLABLE_MARKER)?;
        }
        write!(f, "{}", self.name)
    }
}
