//! Static type checking of predicate trees
//!
//! Every expression is assigned a `ScalarKind` before it is ever run, so
//! type errors surface at compile time instead of per row.

use super::ast::{BinaryOp, Expr, Function, UnaryOp};
use super::env::Environment;
use super::errors::{ExprError, ExprResult};
use crate::value::ScalarKind;

/// Returns the kind `expr` evaluates to under `env`.
pub fn check(expr: &Expr, env: &Environment) -> ExprResult<ScalarKind> {
    match expr {
        Expr::Literal(value) => Ok(value.kind()),
        Expr::Name(name) => env
            .get(name)
            .ok_or_else(|| ExprError::UnknownName(name.clone())),
        Expr::Unary { op, operand } => {
            let kind = check(operand, env)?;
            match op {
                UnaryOp::Not if kind == ScalarKind::Bool => Ok(ScalarKind::Bool),
                UnaryOp::Neg if kind.is_numeric() => Ok(kind),
                UnaryOp::Not => Err(ExprError::type_error(format!("cannot negate {}", kind))),
                UnaryOp::Neg => Err(ExprError::type_error(format!("cannot apply '-' to {}", kind))),
            }
        }
        Expr::Binary { op, left, right } => {
            let left = check(left, env)?;
            let right = check(right, env)?;
            check_binary(*op, left, right)
        }
        Expr::In { needle, items } => {
            check(needle, env)?;
            for item in items {
                check(item, env)?;
            }
            Ok(ScalarKind::Bool)
        }
        Expr::Call { function, args } => {
            if args.len() != function.arity() {
                return Err(ExprError::type_error(format!(
                    "{}() takes {} argument(s), got {}",
                    function.name(),
                    function.arity(),
                    args.len()
                )));
            }
            let kinds = args
                .iter()
                .map(|arg| check(arg, env))
                .collect::<ExprResult<Vec<_>>>()?;
            check_call(*function, &kinds)
        }
    }
}

fn check_binary(op: BinaryOp, left: ScalarKind, right: ScalarKind) -> ExprResult<ScalarKind> {
    use ScalarKind::*;

    let result = match op {
        BinaryOp::Eq | BinaryOp::Ne => Some(Bool),
        BinaryOp::And | BinaryOp::Or => (left == Bool && right == Bool).then_some(Bool),
        op if op.is_ordering() => {
            let comparable = (left.is_numeric() && right.is_numeric())
                || (left == right && matches!(left, String | Bytes | Timestamp));
            comparable.then_some(Bool)
        }
        op if op.is_string_test() => (left == String && right == String).then_some(Bool),
        BinaryOp::Add if left == String && right == String => Some(String),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => match (left, right) {
            (Integer, Integer) => Some(Integer),
            (l, r) if l.is_numeric() && r.is_numeric() => Some(Float),
            _ => None,
        },
        BinaryOp::Div => (left.is_numeric() && right.is_numeric()).then_some(Float),
        BinaryOp::Rem => (left == Integer && right == Integer).then_some(Integer),
        _ => None,
    };

    result.ok_or_else(|| {
        ExprError::type_error(format!(
            "operator {} not defined for {} and {}",
            op.symbol(),
            left,
            right
        ))
    })
}

fn check_call(function: Function, args: &[ScalarKind]) -> ExprResult<ScalarKind> {
    use ScalarKind::*;

    let result = match (function, args) {
        (Function::Len, [String | Bytes]) => Some(Integer),
        (Function::Lower | Function::Upper, [String]) => Some(String),
        (Function::Abs, [kind]) if kind.is_numeric() => Some(*kind),
        (Function::Now, []) => Some(Timestamp),
        _ => None,
    };

    result.ok_or_else(|| {
        let kinds: Vec<&str> = args.iter().map(|k| k.as_str()).collect();
        ExprError::type_error(format!(
            "{}() not defined for ({})",
            function.name(),
            kinds.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    fn env() -> Environment {
        Environment::new()
            .with("value", ScalarKind::Integer)
            .with("name", ScalarKind::String)
            .with("type", ScalarKind::String)
    }

    fn kind_of(source: &str) -> ExprResult<ScalarKind> {
        check(&parse(source).unwrap(), &env())
    }

    #[test]
    fn test_boolean_predicates() {
        assert_eq!(kind_of("value > 0 && value < 10").unwrap(), ScalarKind::Bool);
        assert_eq!(kind_of("value == nil").unwrap(), ScalarKind::Bool);
        assert_eq!(kind_of("name matches '^a'").unwrap(), ScalarKind::Bool);
        assert_eq!(kind_of("type in ['int', 'integer']").unwrap(), ScalarKind::Bool);
    }

    #[test]
    fn test_non_boolean_results() {
        assert_eq!(kind_of("value + 1").unwrap(), ScalarKind::Integer);
        assert_eq!(kind_of("value / 2").unwrap(), ScalarKind::Float);
        assert_eq!(kind_of("name + 'x'").unwrap(), ScalarKind::String);
        assert_eq!(kind_of("len(name)").unwrap(), ScalarKind::Integer);
        assert_eq!(kind_of("now()").unwrap(), ScalarKind::Timestamp);
    }

    #[test]
    fn test_type_errors() {
        assert!(matches!(kind_of("value > 'a'"), Err(ExprError::Type(_))));
        assert!(matches!(kind_of("value && true"), Err(ExprError::Type(_))));
        assert!(matches!(kind_of("!value"), Err(ExprError::Type(_))));
        assert!(matches!(kind_of("len(value)"), Err(ExprError::Type(_))));
        assert!(matches!(kind_of("len()"), Err(ExprError::Type(_))));
        assert!(matches!(kind_of("value contains 'a'"), Err(ExprError::Type(_))));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            kind_of("valeu == 1"),
            Err(ExprError::UnknownName("valeu".to_string()))
        );
    }
}
