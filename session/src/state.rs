//! Session state types.
//!
//! The durable JSON contract lives here: a [`Session`] serializes to
//! `{token, user, issuedAt, expiresAt, refreshToken?}` with timestamps as
//! integer milliseconds since epoch. Decoding is strict in the sense that a
//! record missing required fields or carrying wrong types fails to decode at
//! all; the storage adapter then treats it as absent rather than trusting
//! it partially.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// Identity
// ═══════════════════════════════════════════════════════════════════════

/// Authenticated identity embedded in a session.
///
/// Never persisted on its own; it always travels inside [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name. The only required identity field.
    pub username: String,

    /// Email address, if the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role label (e.g. "admin"), if the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Opaque backend identifier, if the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl User {
    /// Create a user with only a username.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            role: None,
            id: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// The durable record proving a user is authenticated.
///
/// Invariant at creation: `expires_at > issued_at`. A session with
/// `expires_at <= now` is expired regardless of its other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque credential attached to outbound requests as a bearer token.
    pub token: String,

    /// The authenticated identity.
    pub user: User,

    /// Absolute creation timestamp.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,

    /// Absolute expiry timestamp.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,

    /// Optional opaque refresh credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    /// Whether the session is past its expiry at the given instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the session is usable at the given instant: non-empty token
    /// and strictly before expiry. (The identity is present by construction;
    /// a record without one fails to decode.)
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && !self.is_expired(now)
    }

    /// Remaining validity window at the given instant, clamped at zero.
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// User patch
// ═══════════════════════════════════════════════════════════════════════

/// Field-level update for the identity embedded in the current session.
///
/// Only the fields set here change; everything else is kept. An explicit
/// schema instead of a free-form partial object, so a typo'd field is a
/// compile error rather than a silently ignored key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replace the username.
    pub username: Option<String>,
    /// Replace the email address.
    pub email: Option<String>,
    /// Replace the role label.
    pub role: Option<String>,
    /// Replace the backend identifier.
    pub id: Option<String>,
}

impl UserPatch {
    /// Shallow-merge this patch into `user`.
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = Some(email);
        }
        if let Some(role) = self.role {
            user.role = Some(role);
        }
        if let Some(id) = self.id {
            user.id = Some(id);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Query result
// ═══════════════════════════════════════════════════════════════════════

/// Tri-state outcome of reading the durable session record.
///
/// Distinguishes "no session ever existed" from "session existed but
/// lapsed": the first drives a silent redirect to login, the second may
/// surface expiry messaging.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionQuery {
    /// No record under the session key.
    Absent,

    /// A record existed but was past expiry; it has been deleted.
    Expired,

    /// A usable session.
    Valid(Session),
}

impl SessionQuery {
    /// The session, when valid.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Valid(session) => Some(session),
            Self::Absent | Self::Expired => None,
        }
    }

    /// Consume the query, yielding the session when valid.
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Valid(session) => Some(session),
            Self::Absent | Self::Expired => None,
        }
    }

    /// `true` iff a usable session was found.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// `true` iff a record existed but had lapsed.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}
