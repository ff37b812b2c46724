//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Begin/complete scopes with elapsed time
//!
//! Observability is read-only: it never changes the outcome of a
//! reconciliation.
//!
//! ```ignore
//! use tabsync::observability::{Event, Logger, LogLevel, ObservationScope};
//!
//! Logger::set_min_level(LogLevel::Warn);
//! Event::TableMissing.emit(&[("table", "users")]);
//!
//! let scope = ObservationScope::new("VALIDATE_TABLES");
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{LogLevel, Logger};
pub use scope::ObservationScope;
