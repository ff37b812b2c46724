//! Pluggable expression engine
//!
//! The validator layer only needs two operations: compile a source string
//! against an environment, and run the compiled program with bindings.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use super::ast::{BinaryOp, Expr};
use super::checker::check;
use super::env::{Bindings, Environment};
use super::errors::{ExprError, ExprResult};
use super::eval::evaluate;
use super::parser::parse;
use crate::value::{ScalarKind, ScalarValue};

/// A compiled, type-checked predicate.
///
/// Programs are immutable and may be shared across threads.
pub trait Program: fmt::Debug + Send + Sync {
    /// Source text the program was compiled from
    fn source(&self) -> &str;

    /// Kind of the value `run` produces
    fn result_kind(&self) -> ScalarKind;

    /// Evaluates the program against `bindings`
    fn run(&self, bindings: &Bindings) -> ExprResult<ScalarValue>;
}

/// Compiles predicate source into runnable programs.
pub trait ExpressionEngine: fmt::Debug + Send + Sync {
    /// Parses and type-checks `source` against `env`.
    fn compile(&self, source: &str, env: &Environment) -> ExprResult<Box<dyn Program>>;
}

/// The bundled predicate language
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl BuiltinEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEngine for BuiltinEngine {
    fn compile(&self, source: &str, env: &Environment) -> ExprResult<Box<dyn Program>> {
        Ok(Box::new(CompiledProgram::compile(source, env)?))
    }
}

/// Program produced by `BuiltinEngine`
#[derive(Debug)]
pub struct CompiledProgram {
    source: String,
    root: Expr,
    result_kind: ScalarKind,
    patterns: BTreeMap<String, Regex>,
}

impl CompiledProgram {
    /// Parses, type-checks and precompiles literal regex patterns.
    pub fn compile(source: &str, env: &Environment) -> ExprResult<Self> {
        let root = parse(source)?;
        let result_kind = check(&root, env)?;

        let mut patterns = BTreeMap::new();
        collect_patterns(&root, &mut patterns)?;

        Ok(Self {
            source: source.to_string(),
            root,
            result_kind,
            patterns,
        })
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }
}

impl Program for CompiledProgram {
    fn source(&self) -> &str {
        &self.source
    }

    fn result_kind(&self) -> ScalarKind {
        self.result_kind
    }

    fn run(&self, bindings: &Bindings) -> ExprResult<ScalarValue> {
        evaluate(&self.root, bindings, &self.patterns)
    }
}

fn collect_patterns(expr: &Expr, patterns: &mut BTreeMap<String, Regex>) -> ExprResult<()> {
    match expr {
        Expr::Literal(_) | Expr::Name(_) => Ok(()),
        Expr::Unary { operand, .. } => collect_patterns(operand, patterns),
        Expr::Binary { op, left, right } => {
            if let (BinaryOp::Matches, Expr::Literal(ScalarValue::String(pattern))) =
                (op, right.as_ref())
            {
                if !patterns.contains_key(pattern) {
                    let regex = Regex::new(pattern).map_err(|e| ExprError::InvalidRegex {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
                    patterns.insert(pattern.clone(), regex);
                }
            }
            collect_patterns(left, patterns)?;
            collect_patterns(right, patterns)
        }
        Expr::In { needle, items } => {
            collect_patterns(needle, patterns)?;
            items.iter().try_for_each(|item| collect_patterns(item, patterns))
        }
        Expr::Call { args, .. } => args.iter().try_for_each(|arg| collect_patterns(arg, patterns)),
    }
}
