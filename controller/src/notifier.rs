//! Expiration notifier.
//!
//! Presentation-side companion to the controller's expiring-soon flag. The
//! controller decides *whether* the session is close to expiry; the notifier
//! decides *whether to prompt*, remembering that the operator already waved
//! the warning away.
//!
//! Dismissal is sticky only until the controller re-asserts the flag. The
//! background check re-sends `true` on every tick while the warning holds,
//! so a dismissed prompt comes back one check interval later and the
//! operator cannot silence the warning permanently.

use crate::controller::SessionController;
use notify_console_session::Clock;
use std::sync::Arc;
use tokio::sync::watch;

/// Tracks whether an expiry warning should currently be shown.
///
/// One notifier per view; each keeps its own dismissal state while all
/// observe the same controller flag.
#[derive(Debug)]
pub struct ExpiryNotifier<C: Clock + 'static> {
    controller: Arc<SessionController<C>>,
    expiring_rx: watch::Receiver<bool>,
    dismissed: bool,
}

impl<C: Clock + 'static> ExpiryNotifier<C> {
    /// Create a notifier observing the controller's expiring-soon flag.
    #[must_use]
    pub fn new(controller: Arc<SessionController<C>>) -> Self {
        let expiring_rx = controller.expiring_changes();
        Self {
            controller,
            expiring_rx,
            dismissed: false,
        }
    }

    /// Whether the expiry prompt should be shown right now.
    ///
    /// `true` while the controller asserts the expiring-soon flag and the
    /// operator has not dismissed this assertion. Any fresh signal from the
    /// controller clears the dismissal.
    pub fn should_prompt(&mut self) -> bool {
        if self.expiring_rx.has_changed().unwrap_or(false) {
            self.expiring_rx.mark_unchanged();
            self.dismissed = false;
        }
        *self.expiring_rx.borrow() && !self.dismissed
    }

    /// Suppress the prompt until the controller next asserts the flag.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    /// Extend the session from the prompt ("stay logged in").
    ///
    /// Returns `false` when there was nothing left to extend; the session
    /// has lapsed and the next background check will log the operator out.
    pub async fn extend(&mut self) -> bool {
        let extended = self.controller.refresh().await;
        if extended {
            self.dismissed = false;
        }
        extended
    }

    /// Remaining session validity, for countdown display in the prompt.
    /// Zero when no valid session is stored.
    #[must_use]
    pub fn time_remaining(&self) -> chrono::Duration {
        self.controller.manager().time_remaining()
    }
}
