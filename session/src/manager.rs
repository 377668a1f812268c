//! The session manager.
//!
//! Sole authority on session persistence-key addressing and validity logic.
//! The manager itself is stateless; the only durable copy of the session
//! lives in the storage adapter under [`constants::SESSION_KEY`].
//!
//! Every operation that depends on storage reports failure as `false` or
//! `None`: no retries, no exceptions. Callers decide whether a failed write
//! is worth surfacing to the user.

use crate::clock::{Clock, SystemClock};
use crate::constants::{self, DEFAULT_SESSION_TTL_SECS};
use crate::state::{Session, SessionQuery, User, UserPatch};
use chrono::Duration;
use notify_console_storage::{ScopedStore, StorageScope};

/// Stateless façade over the durable session record.
///
/// Generic over [`Clock`] so expiry arithmetic is deterministic under test;
/// production code uses the [`SystemClock`] default.
#[derive(Debug, Clone)]
pub struct SessionManager<C = SystemClock> {
    store: ScopedStore,
    clock: C,
}

impl SessionManager<SystemClock> {
    /// Create a manager over `store` using the system clock.
    #[must_use]
    pub const fn new(store: ScopedStore) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> SessionManager<C> {
    /// Create a manager with an injected clock.
    #[must_use]
    pub const fn with_clock(store: ScopedStore, clock: C) -> Self {
        Self { store, clock }
    }

    /// Probe whether the durable scope accepts writes.
    ///
    /// The lifecycle controller calls this before its first restore so a
    /// disabled data directory degrades to anonymous state instead of a
    /// crash during startup.
    #[must_use]
    pub fn is_storage_available(&self) -> bool {
        self.store.is_available(StorageScope::Durable)
    }

    /// Build a new session stamped at the current instant.
    ///
    /// `ttl` defaults to 24 hours. Pure construction; nothing is persisted
    /// until [`SessionManager::save`] is called.
    #[must_use]
    pub fn create_session(
        &self,
        token: String,
        user: User,
        ttl: Option<Duration>,
        refresh_token: Option<String>,
    ) -> Session {
        let issued_at = self.clock.now();
        let ttl = ttl.unwrap_or_else(|| Duration::seconds(DEFAULT_SESSION_TTL_SECS));
        Session {
            token,
            user,
            issued_at,
            expires_at: issued_at + ttl,
            refresh_token,
        }
    }

    /// Persist `session` under the fixed key, overwriting any prior record.
    pub fn save(&self, session: &Session) -> bool {
        self.store
            .set(constants::SESSION_KEY, session, StorageScope::Durable)
    }

    /// Load the raw session record, if one decodes.
    ///
    /// No expiry enforcement happens here; use
    /// [`SessionManager::query_state`] for validity-aware reads.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        self.store.get(constants::SESSION_KEY, StorageScope::Durable)
    }

    /// Remove the durable session record.
    pub fn clear(&self) -> bool {
        self.store.remove(constants::SESSION_KEY, StorageScope::Durable)
    }

    /// Whether `session` is past expiry right now.
    #[must_use]
    pub fn is_expired(&self, session: &Session) -> bool {
        session.is_expired(self.clock.now())
    }

    /// Whether `session` is usable right now. `None` is never valid.
    #[must_use]
    pub fn is_valid(&self, session: Option<&Session>) -> bool {
        session.is_some_and(|s| s.is_valid(self.clock.now()))
    }

    /// Read the durable record and classify it as absent, expired, or valid.
    ///
    /// An unusable record is deleted as a side effect of being observed, so
    /// any code path that reads session state also enforces expiry. A stale
    /// session cannot linger past its deadline waiting for the background
    /// timer.
    ///
    /// `Expired` is reserved for records that actually lapsed; a record that
    /// is unusable without having lapsed (empty token) is removed and
    /// reported as `Absent`, so expiry messaging never fires for a session
    /// that never lived.
    pub fn query_state(&self) -> SessionQuery {
        let Some(session) = self.load() else {
            return SessionQuery::Absent;
        };

        let now = self.clock.now();
        if session.is_valid(now) {
            SessionQuery::Valid(session)
        } else if session.is_expired(now) {
            tracing::info!(
                expires_at = %session.expires_at,
                "Session lapsed, removing durable record"
            );
            self.clear();
            SessionQuery::Expired
        } else {
            tracing::warn!("Unusable session record, removing");
            self.clear();
            SessionQuery::Absent
        }
    }

    /// Push the current session's expiry out to `now + additional`
    /// (default 24 hours) and re-persist it.
    ///
    /// Fails closed when no session is stored or the stored one has already
    /// expired: an expired session cannot be revived, only a fresh login
    /// creates a new one.
    pub fn extend(&self, additional: Option<Duration>) -> bool {
        let Some(mut session) = self.query_state().into_session() else {
            return false;
        };

        let additional = additional.unwrap_or_else(|| Duration::seconds(DEFAULT_SESSION_TTL_SECS));
        session.expires_at = self.clock.now() + additional;
        self.save(&session)
    }

    /// Shallow-merge `patch` into the current session's identity and
    /// re-persist it. Fails closed when no valid session is stored.
    pub fn merge_user(&self, patch: UserPatch) -> bool {
        let Some(mut session) = self.query_state().into_session() else {
            return false;
        };

        patch.apply(&mut session.user);
        self.save(&session)
    }

    /// Remaining validity window, zero when no valid session is stored.
    #[must_use]
    pub fn time_remaining(&self) -> Duration {
        self.query_state()
            .session()
            .map_or_else(Duration::zero, |s| s.time_remaining(self.clock.now()))
    }

    /// Whether the remaining window is non-zero and at most `threshold`.
    #[must_use]
    pub fn is_expiring_soon(&self, threshold: Duration) -> bool {
        let remaining = self.time_remaining();
        remaining > Duration::zero() && remaining <= threshold
    }

    /// The current token, when a valid session is stored.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.query_state().into_session().map(|s| s.token)
    }

    /// The current identity, when a valid session is stored.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.query_state().into_session().map(|s| s.user)
    }

    /// `Authorization` header value for outbound requests, when a valid
    /// session is stored.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {token}"))
    }
}
