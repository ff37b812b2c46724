//! Scalar value domain for table snapshots
//!
//! Dumped cells and fixture literals share one closed set of
//! dynamically-typed scalars:
//!
//! - `Null`
//! - `Integer` (i64), `Float` (f64)
//! - `Bool`
//! - `Bytes`, `String`
//! - `Timestamp` (UTC)
//!
//! # Ordering
//!
//! `compare` is a total order over the whole domain, parameterized by
//! `NullPlacement`. Heterogeneous values are resolved by type priority:
//! numbers > bytes/strings > timestamps, with booleans coerced when possible.

mod ordering;
mod scalar;

pub use ordering::{compare, NullPlacement};
pub use scalar::{coerce_bool, ScalarKind, ScalarValue};
