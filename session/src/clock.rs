//! Clock abstraction.
//!
//! All validity arithmetic depends on "now", so time is injected rather than
//! read ambiently. Production code uses [`SystemClock`]; tests use the
//! deterministic clocks from the testing crate.

use chrono::{DateTime, Utc};

/// Clock trait - abstracts time operations for testability.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
