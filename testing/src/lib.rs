//! # Notify Console Testing
//!
//! Testing utilities and helpers for the notify-console session core.
//!
//! This crate provides:
//! - Deterministic clock implementations of the session crate's `Clock` trait
//! - Builders for managers wired to in-memory storage
//!
//! ## Example
//!
//! ```
//! use notify_console_testing::mocks::ManualClock;
//! use notify_console_testing::memory_manager;
//! use notify_console_session::User;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let clock = ManualClock::at(Utc.timestamp_millis_opt(0).single().unwrap_or_default());
//! let manager = memory_manager(clock.clone());
//!
//! let session = manager.create_session(
//!     "tok".to_string(),
//!     User::named("admin"),
//!     Some(Duration::seconds(60)),
//!     None,
//! );
//! assert!(manager.save(&session));
//!
//! clock.advance(Duration::seconds(61));
//! assert!(manager.query_state().is_expired());
//! ```

use notify_console_session::SessionManager;
use notify_console_session::clock::Clock;
use notify_console_storage::ScopedStore;

/// Mock implementations for testing.
pub mod mocks {
    use chrono::{DateTime, Duration, Utc};
    use notify_console_session::clock::Clock;
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making tests reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Manually advanced clock for lifecycle tests.
    ///
    /// Clones share the same underlying instant, so a clone handed to a
    /// manager or controller observes every [`ManualClock::advance`] made
    /// from the test body.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock frozen at the given instant.
        #[must_use]
        pub fn at(start: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(start)),
            }
        }

        /// Move the clock forward (or backward, with a negative duration).
        pub fn advance(&self, by: Duration) {
            let mut now = match self.now.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *now = *now + by;
        }

        /// Jump the clock to an absolute instant.
        pub fn set(&self, to: DateTime<Utc>) {
            let mut now = match self.now.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *now = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            match self.now.lock() {
                Ok(guard) => *guard,
                Err(poisoned) => *poisoned.into_inner(),
            }
        }
    }
}

/// Build a session manager over fresh in-memory storage with the given
/// clock. Nothing persists beyond the returned manager's store.
#[must_use]
pub fn memory_manager<C: Clock>(clock: C) -> SessionManager<C> {
    SessionManager::with_clock(ScopedStore::in_memory(), clock)
}

#[cfg(test)]
mod tests {
    use super::mocks::{FixedClock, ManualClock};
    use chrono::{Duration, TimeZone, Utc};
    use notify_console_session::clock::Clock;

    #[test]
    fn test_fixed_clock_never_moves() {
        let start = Utc.timestamp_millis_opt(42_000).single().unwrap_or_default();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let start = Utc.timestamp_millis_opt(0).single().unwrap_or_default();
        let clock = ManualClock::at(start);
        let observer = clock.clone();

        clock.advance(Duration::seconds(90));
        assert_eq!(observer.now(), start + Duration::seconds(90));

        observer.set(start);
        assert_eq!(clock.now(), start);
    }
}
