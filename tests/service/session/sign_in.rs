//! Tests for SessionManager::sign_in and sign_out.
//!
//! This module verifies that a successful sign-in drives the notification listener to a
//! loaded profile, that rejected credentials and unresponsive backends surface as
//! classified errors, and that signing out clears the session.

use std::time::Duration;

use linkshield::{
    backend::BackendClient,
    config::{Config, Timeouts},
    error::{Error, ErrorKind},
    service::session::{SessionManager, SessionState},
};
use linkshield_test_utils::prelude::*;

use crate::util::{session_manager, wait_for};

/// Tests a password sign-in for a user with a profile.
///
/// Verifies that the listener started by init loads the profile after the sign-in
/// notification.
///
/// Expected: Ok, then Ready
#[tokio::test]
async fn sign_in_loads_profile() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let identity = factory::identity(TEST_AUTH_USER_ID, TEST_EMAIL, true);
    let sign_in = test.auth().create_sign_in_endpoint(identity, 1);
    let _lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        Some(factory::profile(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice")),
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

    session.sign_in(TEST_EMAIL, TEST_PASSWORD).await?;
    let state = wait_for(&mut changes, |state| state.is_authenticated()).await;

    sign_in.assert();
    assert_eq!(state.profile().map(|p| p.user.user_id), Some(TEST_USER_ID));
    assert_eq!(session.client().access_token(), TEST_ACCESS_TOKEN);

    session.dispose();

    Ok(())
}

/// Tests a sign-in with wrong credentials.
///
/// Expected: Err with the service message, session stays signed out
#[tokio::test]
async fn rejected_credentials() {
    let mut test = TestSetup::new().await;
    let _mock = test
        .auth()
        .create_sign_in_rejected_endpoint("Invalid login credentials");

    let session = session_manager(&test);
    session.init().await;

    let err = session.sign_in(TEST_EMAIL, "wrong").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.user_message(), "Invalid login credentials");
    assert_eq!(session.state(), SessionState::SignedOut);
    assert!(session.client().session().is_none());
}

/// Tests a sign-in against a backend that never answers.
///
/// Verifies that the configured sign-in deadline bounds the call.
///
/// Expected: Err(Error::Timeout) naming the operation
#[tokio::test]
async fn sign_in_times_out() -> Result<(), TestError> {
    let (url, server) = TestSetup::silent_server().await?;
    let config = Config::new(url, TEST_ANON_KEY).with_timeouts(Timeouts {
        sign_in: Duration::from_secs(1),
        ..Timeouts::default()
    });
    let session = SessionManager::new(BackendClient::new(&config), &config);

    let err = session.sign_in(TEST_EMAIL, TEST_PASSWORD).await.unwrap_err();
    server.abort();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(matches!(err, Error::Timeout { operation: "Sign in", .. }));
    assert!(err.user_message().starts_with("Request timed out after 1 seconds"));

    Ok(())
}

/// Tests signing out of a loaded session.
///
/// Verifies that the notification clears the state and cancels the user's accessors.
///
/// Expected: SignedOut, accessors unavailable
#[tokio::test]
async fn sign_out_clears_session() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let identity = factory::identity(TEST_AUTH_USER_ID, TEST_EMAIL, true);
    let _sign_in = test.auth().create_sign_in_endpoint(identity, 1);
    let logout = test.auth().create_logout_endpoint();
    let _lookup = test.rest().create_single_endpoint(
        "users",
        "auth_user_id",
        TEST_AUTH_USER_ID,
        Some(factory::profile(TEST_USER_ID, TEST_AUTH_USER_ID, TEST_EMAIL, "alice")),
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
    session.init().await;
    let mut changes = session.subscribe();

    session.sign_in(TEST_EMAIL, TEST_PASSWORD).await?;
    wait_for(&mut changes, |state| state.is_authenticated()).await;
    assert!(session.history_service().is_some());

    session.sign_out().await?;
    let state = wait_for(&mut changes, |state| *state == SessionState::SignedOut).await;

    logout.assert();
    assert!(!state.is_authenticated());
    assert!(session.history_service().is_none());
    assert!(session.client().session().is_none());

    Ok(())
}
