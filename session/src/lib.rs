//! # Notify Console Session
//!
//! Session data model and manager for the notify-console admin application.
//!
//! This crate is the sole authority on what a session *is*: its construction,
//! its durable JSON contract, and its time-based validity arithmetic. It is
//! stateless: the only durable copy of a session lives in the storage
//! adapter under a single fixed key, and the [`SessionManager`] mediates
//! every read and write of it.
//!
//! ## Validity
//!
//! A session is valid iff it has a non-empty token, a user, and the current
//! time is strictly before `expires_at`. Reads go through
//! [`SessionManager::query_state`], which distinguishes three outcomes
//! (absent, expired, valid) and deletes an expired record the moment it is
//! observed, so a stale session can never outlive its deadline just because
//! no background check happened to fire.
//!
//! ## Example
//!
//! ```
//! use notify_console_session::{SessionManager, User};
//! use notify_console_storage::ScopedStore;
//!
//! let manager = SessionManager::new(ScopedStore::in_memory());
//! let session = manager.create_session(
//!     "tok-1".to_string(),
//!     User::named("admin"),
//!     None,
//!     None,
//! );
//! assert!(manager.save(&session));
//! assert!(manager.query_state().is_valid());
//! ```

pub mod clock;
pub mod constants;
pub mod manager;
pub mod state;

pub use clock::{Clock, SystemClock};
pub use manager::SessionManager;
pub use state::{Session, SessionQuery, User, UserPatch};
