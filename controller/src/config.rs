//! Lifecycle controller configuration.
//!
//! Values are fixed at startup, not at runtime. Defaults come from the
//! session crate's constants.

use chrono::Duration;
use notify_console_session::constants::{
    DEFAULT_SESSION_TTL_SECS, EXPIRY_WARNING_SECS, VALIDATION_INTERVAL_SECS,
};

/// Configuration for the session lifecycle controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Lifetime of newly created and refreshed sessions.
    ///
    /// Default: 24 hours
    pub session_duration: Duration,

    /// Remaining-validity threshold below which the expiring-soon flag is
    /// raised.
    ///
    /// Default: 5 minutes
    pub warning_threshold: Duration,

    /// Cadence of the background validity check.
    ///
    /// Default: 60 seconds
    pub check_interval: std::time::Duration,
}

impl ControllerConfig {
    /// Create a configuration with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_duration: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            warning_threshold: Duration::seconds(EXPIRY_WARNING_SECS),
            check_interval: std::time::Duration::from_secs(VALIDATION_INTERVAL_SECS),
        }
    }

    /// Set the session lifetime.
    #[must_use]
    pub const fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    /// Set the expiring-soon warning threshold.
    #[must_use]
    pub const fn with_warning_threshold(mut self, threshold: Duration) -> Self {
        self.warning_threshold = threshold;
        self
    }

    /// Set the background check cadence.
    #[must_use]
    pub const fn with_check_interval(mut self, interval: std::time::Duration) -> Self {
        self.check_interval = interval;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}
