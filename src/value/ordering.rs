//! Total ordering over scalar values
//!
//! Used for sorting dumped rows and for locating rows by primary key.

use std::cmp::Ordering;

use super::scalar::{coerce_bool, ScalarValue};

/// Where `Null` sorts relative to non-null values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPlacement {
    /// Null sorts before any non-null value
    First,
    /// Null sorts after any non-null value
    #[default]
    Last,
}

impl NullPlacement {
    /// Builds the placement from a `nulls_first` flag
    pub fn from_nulls_first(nulls_first: bool) -> Self {
        if nulls_first {
            NullPlacement::First
        } else {
            NullPlacement::Last
        }
    }
}

/// Compares two scalar values.
///
/// Ordering rules:
/// 1. `Null == Null`; otherwise null placement decides
/// 2. Same tag compares natively
/// 3. A `Bool` against anything else coerces the other side when possible
/// 4. Remaining mixed tags compare by type priority
pub fn compare(a: &ScalarValue, b: &ScalarValue, nulls: NullPlacement) -> Ordering {
    use ScalarValue::*;

    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => null_vs_value(nulls),
        (_, Null) => null_vs_value(nulls).reverse(),
        (Bool(a), Bool(b)) => a.cmp(b),
        (Bool(a), other) => compare_bool(*a, other),
        (other, Bool(b)) => compare_bool(*b, other).reverse(),
        _ => compare_non_bool(a, b),
    }
}

fn null_vs_value(nulls: NullPlacement) -> Ordering {
    match nulls {
        NullPlacement::First => Ordering::Less,
        NullPlacement::Last => Ordering::Greater,
    }
}

/// Compares a bool against a non-null, non-bool value.
///
/// An incoercible number outranks the bool; the bool outranks an
/// incoercible byte string, string or timestamp.
fn compare_bool(flag: bool, other: &ScalarValue) -> Ordering {
    match coerce_bool(other) {
        Some(coerced) => flag.cmp(&coerced),
        None if other.kind().is_numeric() => Ordering::Less,
        None => Ordering::Greater,
    }
}

fn compare_non_bool(a: &ScalarValue, b: &ScalarValue) -> Ordering {
    use ScalarValue::*;

    match (a, b) {
        (Integer(a), Integer(b)) => a.cmp(b),
        (Float(a), Float(b)) => compare_f64(*a, *b),
        (Integer(i), Float(f)) => compare_int_float(*i, *f),
        (Float(f), Integer(i)) => compare_int_float(*i, *f).reverse(),
        (String(a), String(b)) => a.cmp(b),
        (Bytes(a), Bytes(b)) => a.cmp(b),
        (Bytes(a), String(b)) => a.as_slice().cmp(b.as_bytes()),
        (String(a), Bytes(b)) => a.as_bytes().cmp(b.as_slice()),
        (Timestamp(a), Timestamp(b)) => a.cmp(b),
        _ => type_priority(a).cmp(&type_priority(b)),
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison, without widening `i` to f64
fn compare_int_float(i: i64, f: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return compare_f64(i as f64, f);
    }
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }

    // in range, so the truncation is exact
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&f).unwrap_or(Ordering::Equal),
        ord => ord,
    }
}

/// Cross-type rank for non-null, non-bool values, highest first:
/// numbers, then bytes/strings, then timestamps
fn type_priority(value: &ScalarValue) -> u8 {
    match value {
        ScalarValue::Integer(_) | ScalarValue::Float(_) => 2,
        ScalarValue::Bytes(_) | ScalarValue::String(_) => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn cmp(a: ScalarValue, b: ScalarValue) -> Ordering {
        compare(&a, &b, NullPlacement::Last)
    }

    #[test]
    fn test_null_equals_null() {
        assert_eq!(
            compare(&ScalarValue::Null, &ScalarValue::Null, NullPlacement::First),
            Ordering::Equal
        );
        assert_eq!(
            compare(&ScalarValue::Null, &ScalarValue::Null, NullPlacement::Last),
            Ordering::Equal
        );
    }

    #[test]
    fn test_integer_float_comparison_is_exact() {
        let big = 1i64 << 53;
        let float = ScalarValue::Float(big as f64);

        assert_eq!(cmp(ScalarValue::Integer(big), float.clone()), Ordering::Equal);
        assert_eq!(cmp(ScalarValue::Integer(big + 1), float.clone()), Ordering::Greater);
        assert_eq!(cmp(float, ScalarValue::Integer(big + 1)), Ordering::Less);

        assert_eq!(cmp(ScalarValue::Integer(2), ScalarValue::Float(2.5)), Ordering::Less);
        assert_eq!(cmp(ScalarValue::Integer(-1), ScalarValue::Float(-0.5)), Ordering::Less);
        assert_eq!(cmp(ScalarValue::Integer(0), ScalarValue::Float(-0.5)), Ordering::Greater);
        assert_eq!(
            cmp(ScalarValue::Integer(i64::MAX), ScalarValue::Float(9.3e18)),
            Ordering::Less
        );
        assert_eq!(
            cmp(ScalarValue::Integer(i64::MIN), ScalarValue::Float(f64::NEG_INFINITY)),
            Ordering::Greater
        );
        assert_eq!(
            cmp(ScalarValue::Integer(i64::MIN), ScalarValue::Float(i64::MIN as f64)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_null_placement() {
        let one = ScalarValue::Integer(1);
        assert_eq!(compare(&ScalarValue::Null, &one, NullPlacement::First), Ordering::Less);
        assert_eq!(compare(&one, &ScalarValue::Null, NullPlacement::First), Ordering::Greater);
        assert_eq!(compare(&ScalarValue::Null, &one, NullPlacement::Last), Ordering::Greater);
        assert_eq!(compare(&one, &ScalarValue::Null, NullPlacement::Last), Ordering::Less);
    }

    #[test]
    fn test_numeric_cross_compare() {
        assert_eq!(cmp(ScalarValue::Integer(2), ScalarValue::Float(2.5)), Ordering::Less);
        assert_eq!(cmp(ScalarValue::Float(2.0), ScalarValue::Integer(2)), Ordering::Equal);
        assert_eq!(cmp(ScalarValue::Integer(-1), ScalarValue::Integer(3)), Ordering::Less);
    }

    #[test]
    fn test_bytes_against_string() {
        assert_eq!(
            cmp(ScalarValue::Bytes(b"abc".to_vec()), ScalarValue::from("abd")),
            Ordering::Less
        );
        assert_eq!(
            cmp(ScalarValue::from("abc"), ScalarValue::Bytes(b"abc".to_vec())),
            Ordering::Equal
        );
    }

    #[test]
    fn test_type_priority() {
        let ts = ScalarValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(cmp(ScalarValue::Integer(0), ScalarValue::from("zzz")), Ordering::Greater);
        assert_eq!(cmp(ScalarValue::from(""), ts.clone()), Ordering::Greater);
        assert_eq!(cmp(ts, ScalarValue::Float(-5.0)), Ordering::Less);
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(cmp(ScalarValue::Bool(true), ScalarValue::Integer(1)), Ordering::Equal);
        assert_eq!(cmp(ScalarValue::Bool(false), ScalarValue::from("TRUE")), Ordering::Less);
        assert_eq!(cmp(ScalarValue::Integer(0), ScalarValue::Bool(true)), Ordering::Less);
    }

    #[test]
    fn test_bool_incoercible_priority() {
        // numbers outrank bools
        assert_eq!(cmp(ScalarValue::Bool(true), ScalarValue::Integer(7)), Ordering::Less);
        assert_eq!(cmp(ScalarValue::Float(0.5), ScalarValue::Bool(true)), Ordering::Greater);
        // bools outrank strings
        assert_eq!(cmp(ScalarValue::Bool(false), ScalarValue::from("abc")), Ordering::Greater);
        assert_eq!(cmp(ScalarValue::from("abc"), ScalarValue::Bool(false)), Ordering::Less);
    }

    #[test]
    fn test_timestamps_chronological() {
        let early = ScalarValue::Timestamp(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let late = ScalarValue::Timestamp(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(cmp(early, late), Ordering::Less);
    }

    #[test]
    fn test_placement_from_flag() {
        assert_eq!(NullPlacement::from_nulls_first(true), NullPlacement::First);
        assert_eq!(NullPlacement::from_nulls_first(false), NullPlacement::Last);
        assert_eq!(NullPlacement::default(), NullPlacement::Last);
    }
}
