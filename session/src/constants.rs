//! Session constants.
//!
//! Durations are kept as integer seconds so they stay usable in const
//! contexts; call sites build `chrono::Duration` values from them.

/// Fixed storage key for the durable session record.
///
/// There is at most one session per store; writing a new session always
/// overwrites this key.
pub const SESSION_KEY: &str = "auth_session";

/// Default session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Default expiring-soon warning threshold: 5 minutes.
pub const EXPIRY_WARNING_SECS: i64 = 5 * 60;

/// Default cadence of the background validity check: 60 seconds.
pub const VALIDATION_INTERVAL_SECS: u64 = 60;
