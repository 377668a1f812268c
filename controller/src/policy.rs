//! Authentication policy.
//!
//! The controller does not verify credentials itself; verification is a
//! pluggable collaborator selected once at startup. Two policies exist:
//! a real credential check behind the [`CredentialVerifier`] trait, and a
//! development bypass that grants a synthetic identity without any check.
//! Selecting the policy up front keeps bypass branching out of the
//! controller's call sites.

use crate::error::{AuthError, Result};
use chrono::Duration;
use notify_console_session::User;
use std::sync::Arc;

/// Successful outcome of a credential check: everything the controller
/// needs to mint a session.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// Opaque credential for outbound bearer headers.
    pub token: String,

    /// The authenticated identity.
    pub user: User,

    /// Session lifetime; `None` means the default (24 hours).
    pub ttl: Option<Duration>,

    /// Optional opaque refresh credential.
    pub refresh_token: Option<String>,
}

/// Pluggable credential verification.
///
/// Implementations decide what a username/password pair means: a call to
/// the backend, a directory lookup, or the shipped static pair. The
/// controller only sees the grant.
pub trait CredentialVerifier: Send + Sync {
    /// Check the pair and produce a grant.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the pair is rejected.
    fn verify(&self, username: &str, password: &str) -> Result<LoginGrant>;
}

/// Reference verifier holding a single username/password pair.
///
/// The admin console's backend performs no session validation of its own,
/// so this check is advisory: it gates the UI, not the API. Deployments
/// wanting more plug in their own [`CredentialVerifier`].
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    /// Create a verifier accepting exactly this pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<LoginGrant> {
        if username == self.username && password == self.password {
            Ok(LoginGrant {
                token: mint_token(),
                user: User {
                    username: username.to_owned(),
                    email: None,
                    role: Some("admin".to_owned()),
                    id: None,
                },
                ttl: None,
                refresh_token: None,
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Mint an opaque session token.
pub(crate) fn mint_token() -> String {
    format!("session-{}", uuid::Uuid::new_v4().simple())
}

/// Authentication policy, selected once at startup.
#[derive(Clone)]
pub enum AuthPolicy {
    /// Verify credentials through the injected collaborator.
    Credentials(Arc<dyn CredentialVerifier>),

    /// Skip verification entirely and grant this identity.
    ///
    /// Local testing only; a deployed instance must never ship with this
    /// policy.
    DevBypass(User),
}

impl AuthPolicy {
    /// Policy backed by the reference static-pair verifier.
    #[must_use]
    pub fn static_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Credentials(Arc::new(StaticCredentials::new(username, password)))
    }

    /// Bypass policy with a synthetic development identity.
    #[must_use]
    pub fn dev_bypass() -> Self {
        Self::DevBypass(User {
            username: "dev".to_owned(),
            email: Some("dev@localhost".to_owned()),
            role: Some("admin".to_owned()),
            id: Some(uuid::Uuid::new_v4().to_string()),
        })
    }

    /// Run the credential check for a login attempt.
    ///
    /// Under the bypass policy every attempt succeeds with the synthetic
    /// identity.
    pub(crate) fn authenticate(&self, username: &str, password: &str) -> Result<LoginGrant> {
        match self {
            Self::Credentials(verifier) => verifier.verify(username, password),
            Self::DevBypass(user) => Ok(LoginGrant {
                token: mint_token(),
                user: user.clone(),
                ttl: None,
                refresh_token: None,
            }),
        }
    }

    /// The identity to grant unconditionally at startup, if any.
    pub(crate) fn bypass_identity(&self) -> Option<&User> {
        match self {
            Self::Credentials(_) => None,
            Self::DevBypass(user) => Some(user),
        }
    }
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credentials(_) => f.write_str("AuthPolicy::Credentials"),
            Self::DevBypass(user) => f
                .debug_tuple("AuthPolicy::DevBypass")
                .field(&user.username)
                .finish(),
        }
    }
}
