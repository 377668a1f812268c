//! End-to-end lifecycle tests.
//!
//! Drives the controller the way the admin UI does: initialize at startup,
//! start the background check, log in and out, and watch the expiring-soon
//! prompt flow. Session time is driven by a manual clock; the background
//! check cadence is driven by tokio's paused test time, so both clocks are
//! fully deterministic.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use notify_console_controller::{
    AuthPolicy, ControllerConfig, ExpiryNotifier, SessionController,
};
use notify_console_session::{SessionManager, User};
use notify_console_storage::{MemoryBackend, ScopedStore, UnavailableBackend};
use notify_console_testing::mocks::ManualClock;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn start_instant() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000)
        .single()
        .unwrap()
}

/// A controller over fresh in-memory storage, plus handles to the shared
/// clock and store for seeding and inspection.
fn harness(
    config: ControllerConfig,
    policy: AuthPolicy,
) -> (
    Arc<SessionController<ManualClock>>,
    ManualClock,
    SessionManager<ManualClock>,
) {
    init_tracing();
    let clock = ManualClock::at(start_instant());
    let store = ScopedStore::in_memory();
    let manager = SessionManager::with_clock(store, clock.clone());
    let controller = Arc::new(SessionController::new(manager.clone(), policy, config));
    (controller, clock, manager)
}

fn admin_policy() -> AuthPolicy {
    AuthPolicy::static_credentials("admin", "admin123")
}

#[tokio::test]
async fn test_initialize_restores_valid_session() {
    let (controller, _clock, manager) = harness(ControllerConfig::default(), admin_policy());

    // A prior run left a live session behind
    let session = manager.create_session(
        "tok-restored".to_string(),
        User::named("admin"),
        Some(Duration::hours(1)),
        None,
    );
    assert!(manager.save(&session));

    controller.initialize().await;

    let state = controller.snapshot().await;
    assert!(state.is_initialized);
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().username, "admin");
    assert_eq!(state.session.unwrap().token, "tok-restored");
}

#[tokio::test]
async fn test_initialize_clears_expired_session() {
    let (controller, clock, manager) = harness(ControllerConfig::default(), admin_policy());

    let session = manager.create_session(
        "tok-stale".to_string(),
        User::named("admin"),
        Some(Duration::minutes(5)),
        None,
    );
    assert!(manager.save(&session));
    clock.advance(Duration::minutes(6));

    controller.initialize().await;

    let state = controller.snapshot().await;
    assert!(state.is_initialized);
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    // The lapsed record was removed from storage, not just ignored
    assert_eq!(manager.load(), None);
}

#[tokio::test]
async fn test_initialize_with_empty_storage_is_anonymous() {
    let (controller, _clock, _manager) = harness(ControllerConfig::default(), admin_policy());

    controller.initialize().await;

    assert!(controller.is_initialized().await);
    assert!(!controller.is_authenticated().await);
}

#[tokio::test]
async fn test_initialize_runs_once() {
    let (controller, _clock, _manager) = harness(ControllerConfig::default(), admin_policy());

    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);

    // A second initialize must not re-run restoration and knock out the
    // logged-in state
    controller.initialize().await;
    assert!(controller.is_authenticated().await);
}

#[tokio::test]
async fn test_dev_bypass_grants_identity_on_initialize() {
    let (controller, _clock, manager) =
        harness(ControllerConfig::default(), AuthPolicy::dev_bypass());

    controller.initialize().await;

    let state = controller.snapshot().await;
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().username, "dev");
    // The synthetic session is persisted like a real one
    assert_eq!(manager.load().unwrap().user.username, "dev");
}

#[tokio::test(start_paused = true)]
async fn test_validation_requires_initialization() {
    let (controller, _clock, _manager) = harness(ControllerConfig::default(), admin_policy());

    assert!(!Arc::clone(&controller).start_periodic_validation().await);
    assert!(!controller.is_validating().await);

    controller.initialize().await;
    assert!(Arc::clone(&controller).start_periodic_validation().await);
    assert!(controller.is_validating().await);

    // Double start is refused, the running check keeps its cadence
    assert!(!Arc::clone(&controller).start_periodic_validation().await);

    controller.shutdown().await;
}

#[tokio::test]
async fn test_login_success_and_rejection() {
    let (controller, _clock, manager) = harness(ControllerConfig::default(), admin_policy());
    controller.initialize().await;

    assert!(!controller.login("admin", "wrong").await);
    assert!(!controller.is_authenticated().await);

    assert!(controller.login("admin", "admin123").await);
    let state = controller.snapshot().await;
    assert!(state.is_authenticated);
    assert_eq!(state.user.unwrap().username, "admin");
    assert!(manager.load().is_some());

    // A later bad attempt leaves the live session untouched
    assert!(!controller.login("admin", "wrong").await);
    assert!(controller.is_authenticated().await);
}

#[tokio::test]
async fn test_login_fails_when_storage_unavailable() {
    init_tracing();
    let clock = ManualClock::at(start_instant());
    let store = ScopedStore::with_backends(
        Arc::new(UnavailableBackend),
        Arc::new(MemoryBackend::new()),
    );
    let manager = SessionManager::with_clock(store, clock);
    let controller = Arc::new(SessionController::new(
        manager,
        admin_policy(),
        ControllerConfig::default(),
    ));

    controller.initialize().await;
    assert!(controller.is_initialized().await);
    assert!(!controller.is_authenticated().await);

    // Credentials are right, but the session cannot be persisted
    assert!(!controller.login("admin", "admin123").await);
    assert!(!controller.is_authenticated().await);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let (controller, _clock, manager) = harness(ControllerConfig::default(), admin_policy());
    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);

    controller.logout().await;
    assert!(!controller.is_authenticated().await);
    assert_eq!(manager.load(), None);

    controller.logout().await;
    assert!(!controller.is_authenticated().await);
}

#[tokio::test]
async fn test_refresh_extends_session() {
    let (controller, clock, manager) = harness(ControllerConfig::default(), admin_policy());
    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);

    // Five minutes before the 24-hour expiry
    clock.advance(Duration::hours(24) - Duration::minutes(5));
    assert!(manager.is_expiring_soon(Duration::minutes(5)));

    assert!(controller.refresh().await);
    assert!(manager.time_remaining() > Duration::hours(23));
    assert!(controller.is_authenticated().await);
    assert!(!controller.is_session_expiring().await);
}

#[tokio::test]
async fn test_refresh_fails_after_expiry() {
    let (controller, clock, manager) = harness(ControllerConfig::default(), admin_policy());
    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);

    clock.advance(Duration::hours(25));
    assert!(!controller.refresh().await);
    // Expiry is final: the record is gone, only a fresh login recovers
    assert_eq!(manager.load(), None);
}

#[tokio::test]
async fn test_handle_unauthorized_ends_session() {
    let (controller, _clock, manager) = harness(ControllerConfig::default(), admin_policy());
    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);

    controller.handle_unauthorized().await;

    assert!(!controller.is_authenticated().await);
    assert_eq!(manager.load(), None);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_check_logs_out_expired_session() {
    let config = ControllerConfig::default()
        .with_check_interval(std::time::Duration::from_secs(1));
    let (controller, clock, manager) = harness(config, admin_policy());

    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);
    assert!(Arc::clone(&controller).start_periodic_validation().await);

    // Session time lapses between ticks
    clock.advance(Duration::hours(25));
    tokio::time::sleep(std::time::Duration::from_millis(1_500)).await;

    assert!(!controller.is_authenticated().await);
    assert!(controller.session().await.is_none());
    assert_eq!(manager.load(), None);

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_expiring_prompt_dismiss_and_reassert() {
    let config = ControllerConfig::default()
        .with_session_duration(Duration::minutes(10))
        .with_warning_threshold(Duration::minutes(5))
        .with_check_interval(std::time::Duration::from_secs(1));
    let (controller, clock, _manager) = harness(config, admin_policy());

    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);
    assert!(Arc::clone(&controller).start_periodic_validation().await);

    let mut notifier = ExpiryNotifier::new(Arc::clone(&controller));
    assert!(!notifier.should_prompt());

    // Cross into the warning window, let a check run
    clock.advance(Duration::minutes(6));
    tokio::time::sleep(std::time::Duration::from_millis(1_500)).await;
    assert!(controller.is_session_expiring().await);
    assert!(notifier.should_prompt());

    // Dismissal silences the prompt until the next check re-asserts it
    notifier.dismiss();
    assert!(!notifier.should_prompt());
    tokio::time::sleep(std::time::Duration::from_millis(1_500)).await;
    assert!(notifier.should_prompt());

    // "Stay logged in" extends the session and lowers the warning
    assert!(notifier.extend().await);
    assert!(!controller.is_session_expiring().await);
    tokio::time::sleep(std::time::Duration::from_millis(1_500)).await;
    assert!(!notifier.should_prompt());
    assert!(controller.is_authenticated().await);

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_validation() {
    let config = ControllerConfig::default()
        .with_check_interval(std::time::Duration::from_secs(1));
    let (controller, clock, _manager) = harness(config, admin_policy());

    controller.initialize().await;
    assert!(controller.login("admin", "admin123").await);
    assert!(Arc::clone(&controller).start_periodic_validation().await);

    controller.shutdown().await;
    assert!(!controller.is_validating().await);

    // With the check stopped, nothing observes the lapsed session
    clock.advance(Duration::hours(25));
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    assert!(controller.is_authenticated().await);

    // Shutdown is safe to repeat, and validation can be restarted
    controller.shutdown().await;
    assert!(Arc::clone(&controller).start_periodic_validation().await);
    tokio::time::sleep(std::time::Duration::from_millis(1_500)).await;
    assert!(!controller.is_authenticated().await);

    controller.shutdown().await;
}
