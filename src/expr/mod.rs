//! Embedded predicate language
//!
//! Fixture literals prefixed with `=` are predicates over the candidate
//! value, for example `value > 0 && value < 100` or
//! `value matches '^[a-z]+$'`.
//!
//! # Pipeline
//!
//! 1. Tokenize the source
//! 2. Parse into an AST
//! 3. Type-check the AST against an `Environment` (name -> kind)
//! 4. Evaluate against `Bindings` (name -> value)
//!
//! Steps 1-3 happen once in `ExpressionEngine::compile`; step 4 runs on
//! every `Program::run`. The rest of the crate depends only on the
//! `ExpressionEngine` and `Program` traits, so another evaluator can be
//! plugged in.

mod ast;
mod checker;
mod engine;
mod env;
mod errors;
mod eval;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Expr, Function, UnaryOp};
pub use engine::{BuiltinEngine, CompiledProgram, ExpressionEngine, Program};
pub use env::{Bindings, Environment};
pub use errors::{ExprError, ExprResult};
pub use parser::parse;
