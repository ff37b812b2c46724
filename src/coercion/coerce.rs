//! Literal coercion entry points

use super::errors::CoercionResult;
use super::types::DeclaredType;
use crate::value::ScalarValue;

/// Converts fixture literal text into a typed value.
///
/// # Errors
///
/// - `TABSYNC_UNKNOWN_TYPE` if `declared` names no supported type
/// - `TABSYNC_INVALID_LITERAL` if `literal` does not parse as that type
pub fn coerce(declared: &str, literal: &str) -> CoercionResult<ScalarValue> {
    DeclaredType::parse(declared)?.coerce(literal)
}

/// Returns a zero-valued instance of the declared type and whether the
/// declaration carried the nullable marker.
pub fn probe(declared: &str) -> CoercionResult<(ScalarValue, bool)> {
    let ty = DeclaredType::parse(declared)?;
    Ok((ty.zero(), ty.is_nullable()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce("text", "a").unwrap(), ScalarValue::from("a"));
    }

    #[test]
    fn test_coerce_nullable_integer() {
        assert_eq!(coerce("?integer", "Null").unwrap(), ScalarValue::Null);
        assert_eq!(coerce("?integer", "5").unwrap(), ScalarValue::Integer(5));
    }

    #[test]
    fn test_coerce_rejects_garbage() {
        assert!(coerce("int", "five").is_err());
        assert!(coerce("blob", "x").is_err());
    }

    #[test]
    fn test_probe() {
        assert_eq!(probe("int").unwrap(), (ScalarValue::Integer(0), false));
        assert_eq!(probe("?uuid").unwrap(), (ScalarValue::String(String::new()), true));
        assert!(probe("nope").is_err());
    }
}
