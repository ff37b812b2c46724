//! Tree-walking evaluator

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Utc;
use regex::Regex;

use super::ast::{BinaryOp, Expr, Function, UnaryOp};
use super::env::Bindings;
use super::errors::{ExprError, ExprResult};
use crate::value::ScalarValue;

/// Evaluates `expr` against `bindings`.
///
/// `patterns` holds regexes precompiled for literal `matches` operands;
/// any other pattern is compiled on the spot.
pub fn evaluate(
    expr: &Expr,
    bindings: &Bindings,
    patterns: &BTreeMap<String, Regex>,
) -> ExprResult<ScalarValue> {
    Evaluator { bindings, patterns }.eval(expr)
}

struct Evaluator<'a> {
    bindings: &'a Bindings,
    patterns: &'a BTreeMap<String, Regex>,
}

impl Evaluator<'_> {
    fn eval(&self, expr: &Expr) -> ExprResult<ScalarValue> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Name(name) => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| ExprError::eval(format!("name {:?} is not bound", name))),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match (op, value) {
                    (UnaryOp::Not, ScalarValue::Bool(b)) => Ok(ScalarValue::Bool(!b)),
                    (UnaryOp::Neg, ScalarValue::Integer(i)) => i
                        .checked_neg()
                        .map(ScalarValue::Integer)
                        .ok_or_else(|| ExprError::eval("integer overflow")),
                    (UnaryOp::Neg, ScalarValue::Float(f)) => Ok(ScalarValue::Float(-f)),
                    (_, value) => Err(ExprError::eval(format!(
                        "unary operator not defined for {}",
                        value.kind()
                    ))),
                }
            }
            Expr::Binary { op, left, right } => match op {
                BinaryOp::And => {
                    if !self.eval_bool(left)? {
                        return Ok(ScalarValue::Bool(false));
                    }
                    Ok(ScalarValue::Bool(self.eval_bool(right)?))
                }
                BinaryOp::Or => {
                    if self.eval_bool(left)? {
                        return Ok(ScalarValue::Bool(true));
                    }
                    Ok(ScalarValue::Bool(self.eval_bool(right)?))
                }
                op => {
                    let left = self.eval(left)?;
                    let right = self.eval(right)?;
                    self.binary(*op, &left, &right)
                }
            },
            Expr::In { needle, items } => {
                let needle = self.eval(needle)?;
                for item in items {
                    if values_equal(&needle, &self.eval(item)?) {
                        return Ok(ScalarValue::Bool(true));
                    }
                }
                Ok(ScalarValue::Bool(false))
            }
            Expr::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<ExprResult<Vec<_>>>()?;
                call(*function, &args)
            }
        }
    }

    fn eval_bool(&self, expr: &Expr) -> ExprResult<bool> {
        match self.eval(expr)? {
            ScalarValue::Bool(b) => Ok(b),
            other => Err(ExprError::eval(format!("expected bool, got {}", other.kind()))),
        }
    }

    fn binary(&self, op: BinaryOp, left: &ScalarValue, right: &ScalarValue) -> ExprResult<ScalarValue> {
        use ScalarValue::*;

        let result = match op {
            BinaryOp::Eq => Bool(values_equal(left, right)),
            BinaryOp::Ne => Bool(!values_equal(left, right)),
            BinaryOp::Lt => Bool(order(left, right)? == Ordering::Less),
            BinaryOp::Le => Bool(order(left, right)? != Ordering::Greater),
            BinaryOp::Gt => Bool(order(left, right)? == Ordering::Greater),
            BinaryOp::Ge => Bool(order(left, right)? != Ordering::Less),
            BinaryOp::Contains | BinaryOp::StartsWith | BinaryOp::EndsWith | BinaryOp::Matches => {
                let (String(text), String(pattern)) = (left, right) else {
                    return Err(mismatch(op, left, right));
                };
                Bool(match op {
                    BinaryOp::Contains => text.contains(pattern.as_str()),
                    BinaryOp::StartsWith => text.starts_with(pattern.as_str()),
                    BinaryOp::EndsWith => text.ends_with(pattern.as_str()),
                    _ => self.is_match(text, pattern)?,
                })
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => arithmetic(op, left, right)?,
            BinaryOp::Div => {
                let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
                    return Err(mismatch(op, left, right));
                };
                if b == 0.0 {
                    return Err(ExprError::eval("division by zero"));
                }
                Float(a / b)
            }
            BinaryOp::Rem => match (left, right) {
                (Integer(_), Integer(0)) => return Err(ExprError::eval("division by zero")),
                (Integer(a), Integer(b)) => Integer(a.wrapping_rem(*b)),
                _ => return Err(mismatch(op, left, right)),
            },
            BinaryOp::And | BinaryOp::Or => {
                let (Bool(a), Bool(b)) = (left, right) else {
                    return Err(mismatch(op, left, right));
                };
                Bool(if op == BinaryOp::And { *a && *b } else { *a || *b })
            }
        };

        Ok(result)
    }

    fn is_match(&self, text: &str, pattern: &str) -> ExprResult<bool> {
        if let Some(regex) = self.patterns.get(pattern) {
            return Ok(regex.is_match(text));
        }
        let regex = Regex::new(pattern).map_err(|e| ExprError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(regex.is_match(text))
    }
}

/// Equality with numeric widening; `nil` equals only `nil`
fn values_equal(left: &ScalarValue, right: &ScalarValue) -> bool {
    match (left, right) {
        (ScalarValue::Integer(_), ScalarValue::Float(_))
        | (ScalarValue::Float(_), ScalarValue::Integer(_)) => left.as_f64() == right.as_f64(),
        _ => left == right,
    }
}

fn order(left: &ScalarValue, right: &ScalarValue) -> ExprResult<Ordering> {
    use ScalarValue::*;

    let ordering = match (left, right) {
        (Integer(a), Integer(b)) => Some(a.cmp(b)),
        (Integer(_) | Float(_), Integer(_) | Float(_)) => {
            left.as_f64().zip(right.as_f64()).and_then(|(a, b)| a.partial_cmp(&b))
        }
        (String(a), String(b)) => Some(a.cmp(b)),
        (Bytes(a), Bytes(b)) => Some(a.cmp(b)),
        (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
        _ => None,
    };

    ordering.ok_or_else(|| {
        ExprError::eval(format!("cannot order {} and {}", left.kind(), right.kind()))
    })
}

fn arithmetic(op: BinaryOp, left: &ScalarValue, right: &ScalarValue) -> ExprResult<ScalarValue> {
    use ScalarValue::*;

    match (left, right) {
        (String(a), String(b)) if op == BinaryOp::Add => Ok(String(format!("{}{}", a, b))),
        (Integer(a), Integer(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(*b),
                BinaryOp::Sub => a.checked_sub(*b),
                _ => a.checked_mul(*b),
            };
            result
                .map(Integer)
                .ok_or_else(|| ExprError::eval("integer overflow"))
        }
        _ => {
            let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
                return Err(mismatch(op, left, right));
            };
            Ok(Float(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                _ => a * b,
            }))
        }
    }
}

fn call(function: Function, args: &[ScalarValue]) -> ExprResult<ScalarValue> {
    use ScalarValue::*;

    let result = match (function, args) {
        (Function::Len, [String(s)]) => Integer(s.chars().count() as i64),
        (Function::Len, [Bytes(b)]) => Integer(b.len() as i64),
        (Function::Lower, [String(s)]) => String(s.to_lowercase()),
        (Function::Upper, [String(s)]) => String(s.to_uppercase()),
        (Function::Abs, [Integer(i)]) => Integer(
            i.checked_abs()
                .ok_or_else(|| ExprError::eval("integer overflow"))?,
        ),
        (Function::Abs, [Float(f)]) => Float(f.abs()),
        (Function::Now, []) => Timestamp(Utc::now()),
        _ => {
            let kinds: Vec<&str> = args.iter().map(|a| a.kind().as_str()).collect();
            return Err(ExprError::eval(format!(
                "{}() not defined for ({})",
                function.name(),
                kinds.join(", ")
            )));
        }
    };

    Ok(result)
}

fn mismatch(op: BinaryOp, left: &ScalarValue, right: &ScalarValue) -> ExprError {
    ExprError::eval(format!(
        "operator {} not defined for {} and {}",
        op.symbol(),
        left.kind(),
        right.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    fn run(source: &str, value: ScalarValue) -> ExprResult<ScalarValue> {
        let bindings = Bindings::new()
            .bind("value", value)
            .bind("type", ScalarValue::from("text"));
        evaluate(&parse(source).unwrap(), &bindings, &BTreeMap::new())
    }

    #[test]
    fn test_equality() {
        assert_eq!(run("value == 'c'", "c".into()).unwrap(), ScalarValue::Bool(true));
        assert_eq!(run("value == 'c'", "b".into()).unwrap(), ScalarValue::Bool(false));
        assert_eq!(run("value == nil", ScalarValue::Null).unwrap(), ScalarValue::Bool(true));
        assert_eq!(run("value != nil", 1i64.into()).unwrap(), ScalarValue::Bool(true));
        assert_eq!(run("value == 1.0", 1i64.into()).unwrap(), ScalarValue::Bool(true));
    }

    #[test]
    fn test_short_circuit() {
        // the right side would fail to order a null
        assert_eq!(
            run("value != nil && value > 3", ScalarValue::Null).unwrap(),
            ScalarValue::Bool(false)
        );
        assert_eq!(
            run("value == nil || value > 3", ScalarValue::Null).unwrap(),
            ScalarValue::Bool(true)
        );
    }

    #[test]
    fn test_ordering_null_fails() {
        assert!(matches!(run("value > 3", ScalarValue::Null), Err(ExprError::Eval(_))));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("value * 2 + 1", 4i64.into()).unwrap(), ScalarValue::Integer(9));
        assert_eq!(run("value / 2", 5i64.into()).unwrap(), ScalarValue::Float(2.5));
        assert_eq!(run("value % 3", 7i64.into()).unwrap(), ScalarValue::Integer(1));
        assert!(run("value / 0", 1i64.into()).is_err());
        assert!(run("value + 1", i64::MAX.into()).is_err());
    }

    #[test]
    fn test_string_operators() {
        let v = ScalarValue::from("hello world");
        assert_eq!(run("value contains 'lo w'", v.clone()).unwrap(), ScalarValue::Bool(true));
        assert_eq!(run("value startsWith 'he'", v.clone()).unwrap(), ScalarValue::Bool(true));
        assert_eq!(run("value endsWith 'x'", v.clone()).unwrap(), ScalarValue::Bool(false));
        assert_eq!(run("value matches '^h.*d$'", v).unwrap(), ScalarValue::Bool(true));
    }

    #[test]
    fn test_functions() {
        assert_eq!(run("len(value)", "héllo".into()).unwrap(), ScalarValue::Integer(5));
        assert_eq!(run("upper(value)", "ab".into()).unwrap(), ScalarValue::from("AB"));
        assert_eq!(run("abs(value)", (-3i64).into()).unwrap(), ScalarValue::Integer(3));
        assert!(matches!(run("now()", 0i64.into()).unwrap(), ScalarValue::Timestamp(_)));
    }

    #[test]
    fn test_in_list() {
        assert_eq!(run("value in [1, 2, 3]", 2i64.into()).unwrap(), ScalarValue::Bool(true));
        assert_eq!(run("value in [1, 2, 3]", 5i64.into()).unwrap(), ScalarValue::Bool(false));
        assert_eq!(run("type in ['text']", 0i64.into()).unwrap(), ScalarValue::Bool(true));
    }
}
