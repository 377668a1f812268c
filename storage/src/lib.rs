//! # Notify Console Storage
//!
//! Failure-safe scoped key-value storage for the notify-console session core.
//!
//! This crate provides the persistence surface the session subsystem sits on:
//! a [`ScopedStore`] adapter over two storage scopes (durable across process
//! restarts, or alive for the current process only) with typed get/set
//! operations that degrade to safe defaults instead of propagating errors.
//!
//! ## Design
//!
//! The adapter is invoked during application startup, where an unhandled
//! failure would take down the whole shell. Every public operation therefore
//! returns a boolean or `Option` and logs a diagnostic on failure; nothing
//! panics and no error type crosses this crate's public boundary.
//!
//! Availability is confirmed with a real write-then-delete probe rather than
//! by checking that a backend exists, because a backend can be present yet
//! silently reject writes (read-only data directory, exhausted disk).
//!
//! ## Example
//!
//! ```
//! use notify_console_storage::{ScopedStore, StorageScope};
//!
//! let store = ScopedStore::in_memory();
//! assert!(store.set("greeting", &"hello".to_string(), StorageScope::Durable));
//! let value: Option<String> = store.get("greeting", StorageScope::Durable);
//! assert_eq!(value.as_deref(), Some("hello"));
//! ```

pub mod backend;
pub mod error;
pub mod scope;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, UnavailableBackend};
pub use error::StorageError;
pub use scope::StorageScope;
pub use store::ScopedStore;
