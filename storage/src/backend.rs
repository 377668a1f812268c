//! Storage backends.
//!
//! A [`StorageBackend`] moves raw text in and out of one persistence scope.
//! Three implementations ship with the crate:
//!
//! - [`FileBackend`]: one JSON file per key under a data directory, with
//!   atomic write-to-temp-then-rename. Backs the durable scope.
//! - [`MemoryBackend`]: a plain in-memory map. Backs the process scope.
//! - [`UnavailableBackend`]: fails every operation. Stands in for the
//!   durable scope when the data directory cannot be opened, so the adapter
//!   above degrades gracefully instead of the application refusing to start.
//!
//! Backends report failures as [`StorageError`]; the conversion to safe
//! boolean/`None` values happens one layer up in [`crate::ScopedStore`].

use crate::error::{Result, StorageError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Raw text storage for one persistence scope.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read. A missing key
    /// is not an error; it yields `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write does not reach the backing store.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`.
    ///
    /// Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn delete(&self, key: &str) -> Result<()>;

    /// Delete every value in this scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn clear(&self) -> Result<()>;

    /// List every key currently stored in this scope, in no particular
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

// ═══════════════════════════════════════════════════════════════════════
// In-memory backend
// ═══════════════════════════════════════════════════════════════════════

/// In-memory backend for the process scope.
///
/// Values live exactly as long as the owning process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("in-memory map poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("in-memory map poisoned".into()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("in-memory map poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("in-memory map poisoned".into()))?;
        entries.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("in-memory map poisoned".into()))?;
        Ok(entries.keys().cloned().collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// File backend
// ═══════════════════════════════════════════════════════════════════════

/// File-per-key backend for the durable scope.
///
/// Each key becomes `{base_dir}/{key}.json`. Writes go to a temporary file
/// first and are renamed into place, so a crash mid-write never leaves a
/// half-written record behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Open a file backend rooted at `base_dir`, creating the directory if
    /// it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        if !base_dir.exists() {
            std::fs::create_dir_all(&base_dir)?;
        }
        Ok(Self { base_dir })
    }

    /// The directory this backend stores its files in.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File path for a key. Keys are sanitized to a conservative character
    /// set so a key can never escape the base directory.
    fn entry_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(format!("{safe}.json"))
    }

    /// Temporary sibling path used for atomic writes.
    fn temp_path(&self, key: &str) -> PathBuf {
        let mut path = self.entry_path(key);
        path.set_extension("json.tmp");
        path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let temp = self.temp_path(key);
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, self.entry_path(key))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Err(e) = std::fs::remove_file(&path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        return Err(e.into());
                    }
                }
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_owned());
                }
            }
        }
        Ok(keys)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Unavailable backend
// ═══════════════════════════════════════════════════════════════════════

/// Backend that fails every operation.
///
/// Used for the durable scope when the data directory cannot be opened.
/// The adapter's probe reports the scope as unavailable and callers fall
/// back to anonymous behavior instead of crashing at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl UnavailableBackend {
    fn unavailable<T>() -> Result<T> {
        Err(StorageError::Unavailable(
            "durable storage disabled".into(),
        ))
    }
}

impl StorageBackend for UnavailableBackend {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Self::unavailable()
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Self::unavailable()
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Self::unavailable()
    }

    fn clear(&self) -> Result<()> {
        Self::unavailable()
    }

    fn keys(&self) -> Result<Vec<String>> {
        Self::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_memory_backend_write_read_delete() {
        let backend = MemoryBackend::new();

        backend.write("k", "v").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v"));

        backend.delete("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);

        // Deleting a missing key is not an error
        backend.delete("k").unwrap();
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_memory_backend_clear() {
        let backend = MemoryBackend::new();
        backend.write("a", "1").unwrap();
        backend.write("b", "2").unwrap();

        backend.clear().unwrap();
        assert_eq!(backend.read("a").unwrap(), None);
        assert_eq!(backend.read("b").unwrap(), None);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.write("auth_session", r#"{"token":"t"}"#).unwrap();
        assert_eq!(
            backend.read("auth_session").unwrap().as_deref(),
            Some(r#"{"token":"t"}"#)
        );

        backend.delete("auth_session").unwrap();
        assert_eq!(backend.read("auth_session").unwrap(), None);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let backend = FileBackend::open(dir.path()).unwrap();
            backend.write("k", "persisted").unwrap();
        }
        let reopened = FileBackend::open(dir.path()).unwrap();
        assert_eq!(reopened.read("k").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_file_backend_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.write("../../escape", "v").unwrap();
        // The file must land inside the base directory
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            assert!(entry.unwrap().path().starts_with(dir.path()));
        }
        assert_eq!(backend.read("../../escape").unwrap().as_deref(), Some("v"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_file_backend_clear_only_touches_entries() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        backend.write("a", "1").unwrap();
        backend.write("b", "2").unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), "keep").unwrap();

        backend.clear().unwrap();
        assert_eq!(backend.read("a").unwrap(), None);
        assert_eq!(backend.read("b").unwrap(), None);
        assert!(dir.path().join("unrelated.txt").exists());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_keys_list_stored_entries() {
        let memory = MemoryBackend::new();
        memory.write("a", "1").unwrap();
        memory.write("b", "2").unwrap();
        let mut keys = memory.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);

        let dir = tempfile::tempdir().unwrap();
        let file = FileBackend::open(dir.path()).unwrap();
        file.write("auth_session", "{}").unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), "skip").unwrap();
        assert_eq!(file.keys().unwrap(), vec!["auth_session"]);
    }

    #[test]
    fn test_unavailable_backend_fails_everything() {
        let backend = UnavailableBackend;
        assert!(backend.read("k").is_err());
        assert!(backend.write("k", "v").is_err());
        assert!(backend.delete("k").is_err());
        assert!(backend.clear().is_err());
        assert!(backend.keys().is_err());
    }
}
