//! Session lifecycle controller for the notify-console admin UI.
//!
//! This crate owns the reactive half of the session subsystem: the
//! process-wide [`SessionController`] that restores, validates, and ends
//! sessions, the pluggable [`AuthPolicy`] it authenticates through, and the
//! [`ExpiryNotifier`] that turns the expiring-soon flag into a dismissable
//! prompt.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   login/logout    ┌──────────────────────┐
//! │      UI        │ ────────────────▶ │  SessionController   │
//! │  (views/guards)│ ◀──────────────── │  + periodic check    │
//! └────────────────┘  observable state └──────────┬───────────┘
//!         ▲                                       │
//!         │ should_prompt            SessionManager / ScopedStore
//! ┌───────┴────────┐                              │
//! │ ExpiryNotifier │ ◀── watch channel ───────────┘
//! └────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use notify_console_controller::{AuthPolicy, ControllerConfig, SessionController};
//! use notify_console_session::SessionManager;
//! use notify_console_storage::ScopedStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let controller = Arc::new(SessionController::new(
//!     SessionManager::new(ScopedStore::in_memory()),
//!     AuthPolicy::static_credentials("admin", "admin123"),
//!     ControllerConfig::default(),
//! ));
//!
//! controller.initialize().await;
//! assert!(Arc::clone(&controller).start_periodic_validation().await);
//!
//! assert!(controller.login("admin", "admin123").await);
//! assert!(controller.is_authenticated().await);
//!
//! controller.shutdown().await;
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod notifier;
pub mod policy;

pub use config::ControllerConfig;
pub use controller::{ControllerState, SessionController};
pub use error::AuthError;
pub use notifier::ExpiryNotifier;
pub use policy::{AuthPolicy, CredentialVerifier, LoginGrant, StaticCredentials};
