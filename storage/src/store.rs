//! The scoped store adapter.
//!
//! [`ScopedStore`] is the only storage surface the rest of the session core
//! sees. It pairs one backend per [`StorageScope`], serializes values through
//! `serde_json`, and converts every backend failure into a safe return value
//! plus a tracing diagnostic.

use crate::backend::{FileBackend, MemoryBackend, StorageBackend, UnavailableBackend};
use crate::scope::StorageScope;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Throwaway key used by the availability probe.
const PROBE_KEY: &str = "__storage_probe__";

/// Failure-safe, typed key-value store over two persistence scopes.
///
/// All operations are total: they return `bool` or `Option` and never panic
/// or propagate an error. A value that cannot be read, written, or decoded
/// is reported as the safe default (`false` / `None`) and logged.
///
/// Cloning is cheap; clones share the same backends.
#[derive(Clone)]
pub struct ScopedStore {
    durable: Arc<dyn StorageBackend>,
    process: Arc<dyn StorageBackend>,
}

impl ScopedStore {
    /// Open a store with durable values under `data_dir` and process-scoped
    /// values in memory.
    ///
    /// If the data directory cannot be opened the durable scope degrades to
    /// an always-failing backend rather than aborting startup; the condition
    /// is logged and [`ScopedStore::is_available`] reports it.
    #[must_use]
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let durable: Arc<dyn StorageBackend> = match FileBackend::open(data_dir.as_ref()) {
            Ok(backend) => Arc::new(backend),
            Err(e) => {
                tracing::warn!(
                    data_dir = %data_dir.as_ref().display(),
                    error = %e,
                    "Durable storage unavailable, degrading to failing backend"
                );
                Arc::new(UnavailableBackend)
            }
        };

        Self {
            durable,
            process: Arc::new(MemoryBackend::new()),
        }
    }

    /// Open a store with both scopes in memory.
    ///
    /// Nothing survives the process; useful for tests and for deployments
    /// that explicitly opt out of persistence.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            durable: Arc::new(MemoryBackend::new()),
            process: Arc::new(MemoryBackend::new()),
        }
    }

    /// Build a store from explicit backends.
    #[must_use]
    pub fn with_backends(
        durable: Arc<dyn StorageBackend>,
        process: Arc<dyn StorageBackend>,
    ) -> Self {
        Self { durable, process }
    }

    fn backend(&self, scope: StorageScope) -> &dyn StorageBackend {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Process => self.process.as_ref(),
        }
    }

    /// Serialize `value` and write it under `key` in the given scope,
    /// overwriting any prior value.
    ///
    /// Returns `false` when the backend is unreachable, the write fails, or
    /// the value cannot be serialized. Never panics.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, scope: StorageScope) -> bool {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(key, scope = %scope, error = %e, "Failed to serialize value");
                return false;
            }
        };

        match self.backend(scope).write(key, &text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, scope = %scope, error = %e, "Failed to write value");
                false
            }
        }
    }

    /// Read and deserialize the value under `key` in the given scope.
    ///
    /// Returns `None` when the key is absent, the backend is unreachable, or
    /// the stored text does not decode as `T` (malformed records fail
    /// closed). Never panics.
    pub fn get<T: DeserializeOwned>(&self, key: &str, scope: StorageScope) -> Option<T> {
        let text = match self.backend(scope).read(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, scope = %scope, error = %e, "Failed to read value");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, scope = %scope, error = %e, "Stored value is malformed");
                None
            }
        }
    }

    /// Remove the value under `key` in the given scope.
    ///
    /// Removing a missing key succeeds. Returns `false` only when the
    /// backend itself fails.
    pub fn remove(&self, key: &str, scope: StorageScope) -> bool {
        match self.backend(scope).delete(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, scope = %scope, error = %e, "Failed to remove value");
                false
            }
        }
    }

    /// Remove every value in the given scope.
    pub fn clear(&self, scope: StorageScope) -> bool {
        match self.backend(scope).clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(scope = %scope, error = %e, "Failed to clear scope");
                false
            }
        }
    }

    /// Check whether a value exists under `key` in the given scope.
    ///
    /// Returns `false` when the key is absent or the backend is unreachable.
    pub fn contains(&self, key: &str, scope: StorageScope) -> bool {
        match self.backend(scope).read(key) {
            Ok(present) => present.is_some(),
            Err(e) => {
                tracing::debug!(key, scope = %scope, error = %e, "Existence check failed");
                false
            }
        }
    }

    /// Probe whether the scope actually accepts writes.
    ///
    /// Performs a real write-then-delete with a throwaway key. A backend can
    /// be present yet reject writes (read-only directory, full disk), which
    /// a capability check alone would not catch.
    pub fn is_available(&self, scope: StorageScope) -> bool {
        let backend = self.backend(scope);
        if backend.write(PROBE_KEY, "probe").is_err() {
            return false;
        }
        let readable = matches!(backend.read(PROBE_KEY), Ok(Some(_)));
        let _ = backend.delete(PROBE_KEY);
        readable
    }
}

impl std::fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedStore").finish_non_exhaustive()
    }
}
