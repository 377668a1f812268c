//! Storage scopes.

use serde::{Deserialize, Serialize};

/// Persistence scope for a stored value.
///
/// The session core distinguishes two lifetimes: values that must survive a
/// process restart (the durable session record) and values that should die
/// with the current process (scratch state, probes during tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageScope {
    /// Survives process restarts. Backed by files under the application's
    /// data directory.
    Durable,

    /// Lives for the current process only. Backed by an in-memory map.
    Process,
}

impl StorageScope {
    /// Get the scope name as a string, used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Process => "process",
        }
    }
}

impl std::fmt::Display for StorageScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
