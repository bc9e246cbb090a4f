//! Tests for SessionManager::init and session restoration.
//!
//! This module verifies that an existing client session is restored into a loaded
//! profile, that the profile bootstrap runs exactly once per identity, that a bootstrap
//! interrupted after the profile insert is completed later, and that a client without a
//! session settles as signed out.

use linkshield::{
    model::auth::{AuthEvent, AuthSession},
    service::session::SessionState,
};
use linkshield_test_utils::prelude::*;
use serde_json::json;

use crate::util::{session_manager, settled_state};

fn stored_session() -> AuthSession {
    let identity = factory::identity(TEST_AUTH_USER_ID, TEST_EMAIL, true);
    serde_json::from_value(factory::session(identity)).unwrap()
}

/// Tests restoring a session for an identity without a profile.
///
/// Verifies that the profile, its Free subscription and the usage stats are loaded
/// before the session reports ready.
///
/// Expected: Ready with the bootstrapped profile
#[tokio::test]
async fn restores_session_and_bootstraps_profile() {
    let mut test = TestSetup::new().await;
    let lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        None,
        1,
    );
    let bootstrap = test.rest().create_bootstrap_endpoints(
        factory::user_row(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice"),
        1,
    );
    let stats = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, FREE_DAILY_LIMIT, 10)),
        1,
    );

    let session = session_manager(&test);
    session.client().set_session(stored_session());
    session.init().await;

    lookup.assert();
    for mock in &bootstrap {
        mock.assert();
    }
    stats.assert();

    let state = settled_state(&session).await;
    let profile = state.profile().expect("profile should be loaded");
    assert_eq!(profile.user.user_id, TEST_USER_ID);
    assert_eq!(profile.subscription.len(), 1);
    assert!(session.is_authenticated());
    assert!(session.is_email_verified());
    assert_eq!(session.remaining_scans(), 40);
    assert!(session.can_perform_scan());
}

/// Tests repeated sign-in notifications for an identity that already has a profile.
///
/// Verifies that the existing profile is read each time and nothing is inserted.
///
/// Expected: Ready twice, with no bootstrap requests
#[tokio::test]
async fn existing_profile_is_not_recreated() {
    let mut test = TestSetup::new().await;
    let lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        Some(factory::profile(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice")),
        2,
    );
    let bootstrap = test.rest().create_bootstrap_endpoints(
        factory::user_row(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice"),
        0,
    );
    let _stats = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        None,
        2,
    );

    let session = session_manager(&test);
    session
        .handle_auth_event(AuthEvent::SignedIn(stored_session()))
        .await;
    session
        .handle_auth_event(AuthEvent::SignedIn(stored_session()))
        .await;

    lookup.assert();
    for mock in &bootstrap {
        mock.assert();
    }

    let state = session.state();
    assert!(matches!(state, SessionState::Ready { .. }));
    assert_eq!(state.profile().map(|p| p.plan_name()), Some(Some("Free")));
    assert!(session.usage_stats().is_none());
    assert!(!session.can_perform_scan());
}

/// Tests signing in to a profile whose bootstrap stopped before its subscription.
///
/// Verifies that the Free subscription is created on the next sign-in without
/// inserting a second profile.
///
/// Expected: Ready on the Free plan, one plan lookup and one subscription insert
#[tokio::test]
async fn missing_subscription_is_created() {
    let mut test = TestSetup::new().await;
    let mut profile = factory::profile(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice");
    profile["subscription"] = json!([]);
    let _lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        Some(profile),
        1,
    );
    let role = test.rest().create_single_endpoint(
        "role",
        "name",
        "Free",
        Some(factory::role(FREE_ROLE_ID, "Free")),
        0,
    );
    let profile_insert = test.rest().create_insert_endpoint(
        "users",
        json!({ "auth_user_id": TEST_AUTH_USER_ID }),
        factory::user_row(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice"),
        0,
    );
    let plan = test.rest().create_single_endpoint(
        "plan",
        "name",
        "Free",
        Some(factory::plan(FREE_PLAN_ID, "Free", 0.0)),
        1,
    );
    let subscription = test.rest().create_insert_endpoint(
        "subscription",
        json!({ "user_id": TEST_USER_ID, "plan_id": FREE_PLAN_ID, "status": "active" }),
        factory::subscription(1, TEST_USER_ID, FREE_PLAN_ID),
        1,
    );
    let _stats = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        None,
        1,
    );

    let session = session_manager(&test);
    session
        .handle_auth_event(AuthEvent::SignedIn(stored_session()))
        .await;

    role.assert();
    profile_insert.assert();
    plan.assert();
    subscription.assert();

    let state = session.state();
    let profile = state.profile().expect("profile should be loaded");
    assert!(profile.active_subscription().is_some());
    assert_eq!(profile.plan_name(), Some("Free"));
}

/// Tests a profile that cannot be loaded or created.
///
/// Verifies that a failed bootstrap leaves the identity signed in without a profile.
///
/// Expected: IdentityOnly
#[tokio::test]
async fn failed_bootstrap_keeps_identity() {
    let mut test = TestSetup::new().await;
    let _lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        None,
        1,
    );
    let _role = test.rest().create_single_endpoint("role", "name", "Free", None, 1);

    let session = session_manager(&test);
    session
        .handle_auth_event(AuthEvent::SignedIn(stored_session()))
        .await;

    let state = session.state();
    assert!(matches!(state, SessionState::IdentityOnly { .. }));
    assert!(!state.is_authenticated());
    assert!(session.usage_service().is_none());
}

/// Tests initialization without a stored session.
///
/// Expected: SignedOut without any request
#[tokio::test]
async fn no_session_settles_signed_out() {
    let test = TestSetup::new().await;

    let session = session_manager(&test);
    session.init().await;

    assert_eq!(settled_state(&session).await, SessionState::SignedOut);
    assert!(session.identity().is_none());
    assert!(session.scan_service().is_none());
}
