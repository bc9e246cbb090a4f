//! Helpers shared across integration tests.

pub mod realtime;

use std::time::Duration;

use linkshield::{
    backend::BackendClient,
    config::Config,
    service::session::{SessionManager, SessionState},
};
use linkshield_test_utils::prelude::*;
use tokio::sync::watch;

/// Longest a test waits for a background task to publish a state.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn config(test: &TestSetup) -> Config {
    Config::new(test.url(), test.anon_key())
}

/// A client pointed at the test's mock backend.
pub fn client(test: &TestSetup) -> BackendClient {
    BackendClient::new(&config(test))
}

/// A session manager whose client talks to the test's mock backend.
pub fn session_manager(test: &TestSetup) -> SessionManager {
    let config = config(test);
    SessionManager::new(BackendClient::new(&config), &config)
}

/// Wait until the watched value satisfies `done`, returning it.
///
/// # Panics
/// Panics if the value does not settle within [`SETTLE_TIMEOUT`]
pub async fn wait_for<T, F>(receiver: &mut watch::Receiver<T>, done: F) -> T
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    tokio::time::timeout(SETTLE_TIMEOUT, receiver.wait_for(|value| done(value)))
        .await
        .expect("Timed out waiting for state")
        .expect("State channel closed")
        .clone()
}

/// Wait until the session leaves the loading states.
pub async fn settled_state(session: &SessionManager) -> SessionState {
    let mut changes = session.subscribe();
    wait_for(&mut changes, |state| !state.is_loading()).await
}
