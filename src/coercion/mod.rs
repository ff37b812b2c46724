//! Fixture literal coercion
//!
//! Converts literal text from fixtures into typed scalar values, given the
//! declared type of the target column.
//!
//! # Declared types
//!
//! A declared type name may carry the nullable marker `?` as a prefix.
//! Under a nullable declaration the literal `null` (any case) yields `Null`.
//!
//! Unknown type names are configuration errors (FATAL), never per-row
//! mismatches.

mod coerce;
mod errors;
mod types;

pub use coerce::{coerce, probe};
pub use errors::{CoercionError, CoercionErrorCode, CoercionResult};
pub use types::{BaseType, DeclaredType, NULLABLE_MARKER};
