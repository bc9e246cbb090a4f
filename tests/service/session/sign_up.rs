//! Tests for SessionManager::sign_up.
//!
//! This module verifies that sign-up creates the profile and Free subscription, that a
//! failed profile insert does not fail the sign-up, that a sign-up answered with a
//! session creates the profile once, and that a rejected sign-up is reported.

use linkshield::{
    error::{Error, ErrorKind},
    model::auth::SignUpDetails,
};
use linkshield_test_utils::prelude::*;

use crate::util::{session_manager, wait_for};

fn details() -> SignUpDetails {
    SignUpDetails {
        first_name: "Alice".to_string(),
        last_name: "Liddell".to_string(),
        username: "alice".to_string(),
    }
}

fn new_identity() -> serde_json::Value {
    factory::identity_with_metadata(TEST_AUTH_USER_ID, TEST_EMAIL, "Alice", "Liddell", "alice")
}

/// Tests signing up a new identity.
///
/// Verifies that the profile and its subscription are created right after the
/// identity.
///
/// Expected: Ok without a session, every bootstrap request made once
#[tokio::test]
async fn creates_profile_and_subscription() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let sign_up = test.auth().create_sign_up_endpoint(new_identity());
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

    let session = session_manager(&test);
    let response = session.sign_up(TEST_EMAIL, TEST_PASSWORD, &details()).await?;

    sign_up.assert();
    lookup.assert();
    for mock in &bootstrap {
        mock.assert();
    }
    assert!(response.session.is_none());
    assert_eq!(response.identity.map(|i| i.id).as_deref(), Some(TEST_AUTH_USER_ID));

    Ok(())
}

/// Tests signing up when the profile insert is denied.
///
/// Verifies that the profile failure is tolerated, leaving it to the first sign-in.
///
/// Expected: Ok with the new identity
#[tokio::test]
async fn succeeds_when_profile_creation_fails() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let _sign_up = test.auth().create_sign_up_endpoint(new_identity());
    let _lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        None,
        1,
    );
    let _role = test.rest().create_single_endpoint(
        "role",
        "name",
        "Free",
        Some(factory::role(FREE_ROLE_ID, "Free")),
        1,
    );
    let insert = test.rest().create_insert_rejected_endpoint(
        "users",
        403,
        "new row violates row-level security policy for table \"users\"",
    );

    let session = session_manager(&test);
    let response = session.sign_up(TEST_EMAIL, TEST_PASSWORD, &details()).await?;

    insert.assert();
    assert!(response.identity.is_some());
    assert!(session.profile().is_none());

    Ok(())
}

/// Tests signing up while the notification listener runs and confirmation is disabled.
///
/// Verifies that the sign-up's own profile creation and the listener's profile fetch
/// for the new session create the profile and subscription only once.
///
/// Expected: Ready, one lookup finding nothing, one finding the profile, one insert each
#[tokio::test]
async fn session_sign_up_creates_one_profile() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let sign_up = test
        .server
        .mock("POST", "/auth/v1/signup")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(factory::session(new_identity()).to_string())
        .create();
    let missing = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        None,
        1,
    );
    let found = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        Some(factory::profile(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice")),
        1,
    );
    let bootstrap = test.rest().create_bootstrap_endpoints(
        factory::user_row(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice"),
        1,
    );
    let _stats = test.rest().create_single_endpoint(
        "daily_usage_stats",
        "user_id",
        &TEST_USER_ID.to_string(),
        Some(factory::usage_stats(TEST_USER_ID, FREE_DAILY_LIMIT, 0)),
        1,
    );

    let session = session_manager(&test);
    session.init().await;
    let mut changes = session.subscribe();

    let response = session.sign_up(TEST_EMAIL, TEST_PASSWORD, &details()).await?;
    let state = wait_for(&mut changes, |state| state.is_authenticated()).await;

    sign_up.assert();
    missing.assert();
    found.assert();
    for mock in &bootstrap {
        mock.assert();
    }
    assert!(response.session.is_some());
    assert_eq!(state.profile().map(|p| p.user.user_id), Some(TEST_USER_ID));

    session.dispose();

    Ok(())
}

/// Tests signing up with an email address that is already registered.
///
/// Expected: Err with the service message and no profile requests
#[tokio::test]
async fn rejected_sign_up() {
    let mut test = TestSetup::new().await;
    let _sign_up = test
        .auth()
        .create_sign_up_rejected_endpoint(422, "User already registered");
    let lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        None,
        0,
    );

    let session = session_manager(&test);
    let err = session
        .sign_up(TEST_EMAIL, TEST_PASSWORD, &details())
        .await
        .unwrap_err();

    lookup.assert();
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.user_message(), "User already registered");
}
