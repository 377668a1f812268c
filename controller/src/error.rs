//! Error taxonomy for session lifecycle operations.
//!
//! Expected failures never cross the controller's public boundary as errors:
//! login, refresh, and the storage-backed operations report booleans, per the
//! subsystem's fail-safe contract. This taxonomy exists for the internal
//! credential seam and for structured log fields, so a denied login and a
//! lapsed session are distinguishable in the logs even though both surface
//! to the UI as `false`.

use thiserror::Error;

/// Result type alias for credential verification.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure modes of authentication and session lifecycle operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The credential check rejected the username/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session record exists under the session key.
    #[error("No session")]
    SessionAbsent,

    /// A session record existed but was past its expiry.
    #[error("Session has expired")]
    SessionExpired,

    /// The new session could not be written to durable storage.
    #[error("Could not persist session")]
    SessionPersistence,

    /// The backend denied authorization (HTTP 401) for an outbound request.
    #[error("Authorization denied by backend")]
    Unauthorized,
}

impl AuthError {
    /// Returns `true` if this error is due to invalid user input rather than
    /// a system condition.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// Returns `true` if this error means the current session must end
    /// (expiry or a backend denial). These are the logout-triggering modes.
    #[must_use]
    pub const fn ends_session(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthorized)
    }
}
