//! Error types for storage backends.
//!
//! These errors never cross the crate's public boundary: [`crate::ScopedStore`]
//! converts every failure into a boolean or `None` plus a tracing diagnostic.
//! The taxonomy exists so backends can report *why* an operation failed and
//! the adapter can log something more useful than "it broke".

use thiserror::Error;

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failure modes of a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be reached at all (no data directory,
    /// storage explicitly disabled, poisoned in-memory state).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// An I/O operation against the backing store failed (permission
    /// denied, disk full, file vanished between check and use).
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("storage serialization failed: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Returns `true` if the failure means the backend will not accept any
    /// further operations (as opposed to a single operation failing).
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
