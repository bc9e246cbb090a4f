//! Tests for the usage gate around scan submission.
//!
//! This module walks a Free user up to the daily limit: the gate allows the last scan,
//! the ledger change that follows refreshes today's usage, and the gate then closes for
//! the usage accessor, the scan accessor and the session manager alike.

use linkshield::{
    backend::realtime::ChangeEvent,
    error::Error,
    error::usage::UsageError,
    model::usage::{DailyLimit, UsageCounter},
    service::{
        scan::ScanService,
        usage::{UsageGate, UsagePolicy, UsageService},
    },
};
use linkshield_test_utils::prelude::*;
use serde_json::json;

use crate::util::{client, session_manager, wait_for};

/// Tests submitting the last scan of the day.
///
/// Verifies that the stats refreshed after the ledger update report the limit as
/// reached and the gate closes.
///
/// Expected: gate open at 49 of 50, closed at 50 of 50 with nothing remaining
#[tokio::test]
async fn last_scan_closes_gate() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let before = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, FREE_DAILY_LIMIT, 49)),
        1,
    );
    let _insert = test.rest().create_insert_endpoint(
        "scan",
        json!({ "user_id": TEST_USER_ID, "status": "pending" }),
        factory::scan(50, TEST_USER_ID, "https://example.com", "pending"),
        1,
    );

    let backend = client(&test);
    let usage = UsageService::new(backend.clone(), TEST_USER_ID, UsageGate::new(true));
    let scans = ScanService::new(backend, TEST_USER_ID, usage.gate().clone());

    usage.fetch_usage_stats().await?;
    before.assert();
    assert!(usage.can_perform_scan());
    assert_eq!(usage.remaining_scans(), 1);

    scans.submit_scan("https://example.com", None).await?;

    before.remove();
    let _after = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, FREE_DAILY_LIMIT, 50)),
        1,
    );
    let _history = test.rest().create_rows_endpoint(
        "usagecounter",
        "user_id",
        &TEST_USER_ID.to_string(),
        vec![factory::usage_counter(1, TEST_USER_ID, "2025-03-01", 50)],
        1,
    );
    let counter: UsageCounter =
        serde_json::from_value(factory::usage_counter(1, TEST_USER_ID, "2025-03-01", 50))
            .unwrap();
    usage.apply_change(ChangeEvent::Update(counter)).await;

    let stats = usage.usage_stats();
    assert_eq!(usage.remaining_scans(), 0);
    assert!(UsagePolicy::limit_reached(stats.as_ref()));
    assert!(!usage.can_perform_scan());
    assert_eq!(usage.usage_percentage(), 100);

    let limits = usage.plan_limits().unwrap();
    assert_eq!(limits.daily, DailyLimit::Limited(FREE_DAILY_LIMIT));
    assert_eq!(limits.used, 50);
    assert_eq!(limits.remaining, 0);

    let err = scans
        .submit_scan("https://example.com/next", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UsageError(UsageError::LimitReached)));

    Ok(())
}

/// Tests the session manager's gate while its usage accessor follows the ledger.
///
/// Verifies that the session manager and the accessor it hands out read the same
/// usage figures, so the ledger update that spends the last scan closes both.
///
/// Expected: session gate open at 49 of 50, closed at 50 of 50
#[tokio::test]
async fn session_gate_follows_ledger() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let identity = factory::identity(TEST_AUTH_USER_ID, TEST_EMAIL, true);
    let _sign_in = test.auth().create_sign_in_endpoint(identity, 1);
    let _lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        Some(factory::profile(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice")),
        1,
    );
    let before = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, FREE_DAILY_LIMIT, 49)),
        1,
    );

    let session = session_manager(&test);
    session.init().await;
    let mut changes = session.subscribe();
    session.sign_in(TEST_EMAIL, TEST_PASSWORD).await?;
    wait_for(&mut changes, |state| state.is_authenticated()).await;

    before.assert();
    assert!(session.can_perform_scan());
    assert_eq!(session.remaining_scans(), 1);

    before.remove();
    let _after = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, FREE_DAILY_LIMIT, 50)),
        1,
    );
    let _history = test.rest().create_rows_endpoint(
        "usagecounter",
        "user_id",
        &TEST_USER_ID.to_string(),
        vec![factory::usage_counter(1, TEST_USER_ID, "2025-03-01", 50)],
        1,
    );
    let usage = session.usage_service().expect("usage accessor when ready");
    let counter: UsageCounter =
        serde_json::from_value(factory::usage_counter(1, TEST_USER_ID, "2025-03-01", 50))
            .unwrap();
    usage.apply_change(ChangeEvent::Update(counter)).await;

    assert!(!usage.can_perform_scan());
    assert!(!session.can_perform_scan());
    assert_eq!(session.remaining_scans(), 0);
    assert_eq!(session.usage_stats().map(|s| s.scans_used_today), Some(50));

    session.dispose();

    Ok(())
}

/// Tests the gate for an unverified email address.
///
/// Expected: closed despite an unused allowance
#[tokio::test]
async fn unverified_email_closes_gate() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let _stats = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, FREE_DAILY_LIMIT, 0)),
        1,
    );

    let usage = UsageService::new(client(&test), TEST_USER_ID, UsageGate::new(false));
    usage.fetch_usage_stats().await?;

    assert_eq!(usage.remaining_scans(), FREE_DAILY_LIMIT);
    assert!(!usage.can_perform_scan());

    Ok(())
}

/// Tests the gate on an unlimited plan.
///
/// Expected: open with no usage percentage and no negative remaining count
#[tokio::test]
async fn unlimited_plan_never_reaches_limit() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let _stats = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, -1, 500)),
        1,
    );

    let usage = UsageService::new(client(&test), TEST_USER_ID, UsageGate::new(true));
    usage.fetch_usage_stats().await?;

    assert!(usage.can_perform_scan());
    assert_eq!(usage.usage_percentage(), 0);
    assert_eq!(usage.remaining_scans(), 0);
    assert_eq!(
        usage.plan_limits().map(|l| l.daily),
        Some(DailyLimit::Unlimited)
    );

    Ok(())
}
