//! The session lifecycle controller.
//!
//! Process-wide owner of authentication state. One instance is constructed
//! at application startup and handed by reference to whatever needs session
//! state; there is no hidden global.
//!
//! # Lifecycle
//!
//! ```text
//! UNINITIALIZED ──initialize()──▶ READY (authenticated | anonymous)
//!                                   │
//!                     start_periodic_validation()
//!                                   │
//!                         recurring query_state():
//!                           expired → logout
//!                           valid   → recompute expiring-soon
//! ```
//!
//! Initialization runs exactly once and must complete before the periodic
//! validator starts; the start call refuses until it has, so the validator
//! can never misread "not yet restored" as "logged out".
//!
//! Every mutation holds the state write lock across its whole
//! read-modify-persist sequence, so a user click, a timer tick, and a
//! route-guard check can all call in without interleaving corruption.

use crate::config::ControllerConfig;
use crate::error::AuthError;
use crate::policy::{AuthPolicy, mint_token};
use notify_console_session::{Clock, Session, SessionManager, SessionQuery, SystemClock, User};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

/// Observable authentication state.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    /// Whether a valid session is currently adopted.
    pub is_authenticated: bool,

    /// The authenticated identity, when logged in.
    pub user: Option<User>,

    /// The adopted session, when logged in.
    pub session: Option<Session>,

    /// Whether the adopted session's remaining window is below the warning
    /// threshold.
    pub is_session_expiring: bool,

    /// Whether the one-time initialization has completed.
    pub is_initialized: bool,
}

/// Process-wide reactive owner of the session lifecycle.
///
/// Wraps the stateless [`SessionManager`] with in-memory observable state,
/// a one-shot initializer, and a cancellable background validity check.
pub struct SessionController<C = SystemClock> {
    manager: SessionManager<C>,
    policy: AuthPolicy,
    config: ControllerConfig,
    state: RwLock<ControllerState>,
    expiring_tx: watch::Sender<bool>,
    validator: Mutex<Option<JoinHandle<()>>>,
}

impl<C: Clock + 'static> SessionController<C> {
    /// Create a controller. No storage access happens until
    /// [`SessionController::initialize`].
    #[must_use]
    pub fn new(manager: SessionManager<C>, policy: AuthPolicy, config: ControllerConfig) -> Self {
        let (expiring_tx, _) = watch::channel(false);
        Self {
            manager,
            policy,
            config,
            state: RwLock::new(ControllerState::default()),
            expiring_tx,
            validator: Mutex::new(None),
        }
    }

    /// The underlying session manager, for collaborators that need token
    /// projections outside the reactive state (e.g. the outbound HTTP layer
    /// attaching bearer headers).
    #[must_use]
    pub const fn manager(&self) -> &SessionManager<C> {
        &self.manager
    }

    /// Restore session state from durable storage. Runs exactly once per
    /// process; later calls are no-ops.
    ///
    /// Outcomes: a valid stored session is adopted; an expired one is
    /// cleared and the controller stays anonymous; no session leaves it
    /// anonymous. Under the bypass policy a synthetic development session is
    /// created instead. In every case `is_initialized` ends up `true`.
    pub async fn initialize(&self) {
        let mut state = self.state.write().await;
        if state.is_initialized {
            tracing::debug!("Controller already initialized, ignoring");
            return;
        }

        if let Some(user) = self.policy.bypass_identity() {
            tracing::warn!(
                username = %user.username,
                "Auth bypass active, granting development identity"
            );
            let session = self.manager.create_session(
                mint_token(),
                user.clone(),
                Some(self.config.session_duration),
                None,
            );
            if !self.manager.save(&session) {
                tracing::warn!("Could not persist development session");
            }
            Self::adopt(&mut state, session);
            state.is_initialized = true;
            return;
        }

        if !self.manager.is_storage_available() {
            tracing::warn!("Durable storage unavailable, starting anonymous");
            state.is_initialized = true;
            return;
        }

        match self.manager.query_state() {
            SessionQuery::Valid(session) => {
                tracing::info!(
                    username = %session.user.username,
                    expires_at = %session.expires_at,
                    "Restored session from durable storage"
                );
                Self::adopt(&mut state, session);
            }
            SessionQuery::Expired => {
                // query_state already removed the record
                tracing::info!(reason = %AuthError::SessionExpired, "Stored session lapsed");
                Self::reset(&mut state);
            }
            SessionQuery::Absent => {
                tracing::debug!("No stored session, starting anonymous");
            }
        }
        state.is_initialized = true;
    }

    /// Begin the recurring background validity check.
    ///
    /// Refuses (returns `false`) before [`SessionController::initialize`]
    /// has completed and refuses a second concurrent start. The returned
    /// task is owned by the controller and cancelled by
    /// [`SessionController::shutdown`].
    pub async fn start_periodic_validation(self: Arc<Self>) -> bool {
        if !self.state.read().await.is_initialized {
            tracing::warn!("Refusing to start periodic validation before initialization");
            return false;
        }

        let mut validator = self.validator.lock().await;
        if validator.is_some() {
            tracing::debug!("Periodic validation already running");
            return false;
        }

        let weak = Arc::downgrade(&self);
        let period = self.config.check_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; the first real check
            // happens one period after start.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                controller.validate_once().await;
            }
        });
        *validator = Some(handle);
        tracing::debug!(period_secs = period.as_secs(), "Started periodic session validation");
        true
    }

    /// Cancel the background validity check. Safe to call repeatedly and
    /// from any teardown path.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.validator.lock().await.take() {
            handle.abort();
            tracing::debug!("Stopped periodic session validation");
        }
    }

    /// Whether the background validity check is currently running.
    pub async fn is_validating(&self) -> bool {
        self.validator.lock().await.is_some()
    }

    /// Attempt a login. On success the new session is persisted and adopted
    /// and the expiring-soon flag is lowered.
    ///
    /// Returns `false`, leaving prior state untouched, when the credential
    /// check rejects the pair or the session cannot be persisted.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        let grant = match self.policy.authenticate(username, password) {
            Ok(grant) => grant,
            Err(e) => {
                tracing::info!(username, error = %e, "Login rejected");
                return false;
            }
        };

        let mut state = self.state.write().await;
        let session = self.manager.create_session(
            grant.token,
            grant.user,
            grant.ttl.or(Some(self.config.session_duration)),
            grant.refresh_token,
        );
        if !self.manager.save(&session) {
            tracing::warn!(
                username,
                error = %AuthError::SessionPersistence,
                "Could not start session"
            );
            return false;
        }

        tracing::info!(username, expires_at = %session.expires_at, "Logged in");
        Self::adopt(&mut state, session);
        state.is_session_expiring = false;
        self.lower_expiring_flag();
        true
    }

    /// End the session: clear durable storage, reset in-memory state to
    /// anonymous, lower the expiring-soon flag. Idempotent.
    pub async fn logout(&self) {
        let mut state = self.state.write().await;
        self.manager.clear();
        let was_authenticated = state.is_authenticated;
        Self::reset(&mut state);
        self.lower_expiring_flag();
        if was_authenticated {
            tracing::info!("Logged out");
        }
    }

    /// Extend the current session by the configured duration.
    ///
    /// Returns `false` without mutating state when no session is stored or
    /// the stored one has already expired. Expiry is final: only a fresh
    /// login recovers from it.
    pub async fn refresh(&self) -> bool {
        let mut state = self.state.write().await;
        if !self.manager.extend(Some(self.config.session_duration)) {
            tracing::debug!(reason = %AuthError::SessionAbsent, "Refresh failed, nothing to extend");
            return false;
        }

        match self.manager.query_state() {
            SessionQuery::Valid(session) => {
                tracing::info!(expires_at = %session.expires_at, "Session extended");
                Self::adopt(&mut state, session);
                state.is_session_expiring = false;
                self.lower_expiring_flag();
                true
            }
            SessionQuery::Absent | SessionQuery::Expired => false,
        }
    }

    /// React to an authorization denial (HTTP 401) reported by the outbound
    /// API layer: the backend no longer honors the token, so the session
    /// ends exactly as if it had expired.
    pub async fn handle_unauthorized(&self) {
        tracing::warn!(reason = %AuthError::Unauthorized, "Ending session");
        self.logout().await;
    }

    /// Whether a valid session is currently adopted.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    /// The authenticated identity, when logged in.
    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// The adopted session, when logged in.
    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    /// Whether the adopted session is below the warning threshold.
    pub async fn is_session_expiring(&self) -> bool {
        self.state.read().await.is_session_expiring
    }

    /// Whether initialization has completed.
    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.is_initialized
    }

    /// A copy of the full observable state.
    pub async fn snapshot(&self) -> ControllerState {
        self.state.read().await.clone()
    }

    /// Subscribe to expiring-soon changes. The value is re-sent on every
    /// background tick while the warning holds, so observers can re-raise a
    /// dismissed prompt.
    #[must_use]
    pub fn expiring_changes(&self) -> watch::Receiver<bool> {
        self.expiring_tx.subscribe()
    }

    /// One pass of the background check: classify the stored record and
    /// update observable state. Only ever runs after initialization, which
    /// `start_periodic_validation` guarantees by ordering.
    async fn validate_once(&self) {
        let mut state = self.state.write().await;
        if !state.is_initialized {
            return;
        }

        match self.manager.query_state() {
            SessionQuery::Valid(session) => {
                let expiring = self.manager.is_expiring_soon(self.config.warning_threshold);
                Self::adopt(&mut state, session);
                state.is_session_expiring = expiring;
                if expiring {
                    tracing::debug!("Session expiring soon");
                    let _ = self.expiring_tx.send(true);
                } else {
                    self.lower_expiring_flag();
                }
            }
            SessionQuery::Expired => {
                tracing::info!(reason = %AuthError::SessionExpired, "Ending session");
                Self::reset(&mut state);
                self.lower_expiring_flag();
            }
            SessionQuery::Absent => {
                if state.is_authenticated {
                    tracing::warn!("Durable session record vanished, resetting to anonymous");
                    Self::reset(&mut state);
                    self.lower_expiring_flag();
                }
            }
        }
    }

    /// Adopt a session into observable state.
    fn adopt(state: &mut ControllerState, session: Session) {
        state.is_authenticated = true;
        state.user = Some(session.user.clone());
        state.session = Some(session);
    }

    /// Reset observable state to anonymous. Leaves `is_initialized` alone:
    /// logging out does not un-initialize the controller.
    fn reset(state: &mut ControllerState) {
        state.is_authenticated = false;
        state.user = None;
        state.session = None;
        state.is_session_expiring = false;
    }

    /// Lower the expiring-soon flag, notifying observers only on an actual
    /// transition.
    fn lower_expiring_flag(&self) {
        self.expiring_tx.send_if_modified(|flag| {
            if *flag {
                *flag = false;
                true
            } else {
                false
            }
        });
    }
}

impl<C> std::fmt::Debug for SessionController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
