//! Predicate syntax tree

use crate::value::ScalarValue;

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!` / `not`
    Not,
    /// `-`
    Neg,
}

/// Binary operators, listed from loosest to tightest binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Operator spelling used in diagnostics
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Contains => "contains",
            BinaryOp::StartsWith => "startsWith",
            BinaryOp::EndsWith => "endsWith",
            BinaryOp::Matches => "matches",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    pub fn is_string_test(&self) -> bool {
        matches!(
            self,
            BinaryOp::Contains | BinaryOp::StartsWith | BinaryOp::EndsWith | BinaryOp::Matches
        )
    }
}

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Character count of a string, byte count of bytes
    Len,
    Lower,
    Upper,
    Abs,
    /// Current UTC time
    Now,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "len" => Some(Function::Len),
            "lower" => Some(Function::Lower),
            "upper" => Some(Function::Upper),
            "abs" => Some(Function::Abs),
            "now" => Some(Function::Now),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Len => "len",
            Function::Lower => "lower",
            Function::Upper => "upper",
            Function::Abs => "abs",
            Function::Now => "now",
        }
    }

    /// Number of arguments the function takes
    pub fn arity(&self) -> usize {
        match self {
            Function::Now => 0,
            _ => 1,
        }
    }
}

/// Predicate expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(ScalarValue),
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `needle in [a, b, ...]`
    In {
        needle: Box<Expr>,
        items: Vec<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}
