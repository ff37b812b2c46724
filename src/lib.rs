//! tabsync - reconcile database snapshots against declarative expectations
//!
//! Integration tests describe the rows they expect per table. Each cell is
//! either a literal constant or a `=`-prefixed boolean predicate over the
//! actual value. A snapshot is dumped once, rows are matched by primary key
//! and every discrepancy is reported together.
//!
//! ```ignore
//! use tabsync::reconcile::ReconcileEngine;
//! use tabsync::sync::build_expectations;
//!
//! let expected = build_expectations(&dump.schema, &literal_rows)?;
//! let report = ReconcileEngine::default().reconcile(&dump, &expected)?;
//! assert!(report.is_clean(), "{}", report);
//! ```

pub mod cli;
pub mod coercion;
pub mod config;
pub mod errors;
pub mod expr;
pub mod observability;
pub mod reconcile;
pub mod source;
pub mod sync;
pub mod validator;
pub mod value;
