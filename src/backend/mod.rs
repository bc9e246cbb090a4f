//! Typed client for the hosted backend.
//!
//! [`BackendClient`] wraps three surfaces of the hosted service:
//! - the password auth API (`/auth/v1`), see [`auth::AuthApi`]
//! - table-scoped REST CRUD (`/rest/v1/{table}`), see [`query::TableQuery`]
//! - the realtime change feed (`/realtime/v1/websocket`), see [`realtime::RealtimeClient`]
//!
//! The client holds the current auth session; REST and realtime calls authenticate with
//! the session's access token when one is present and with the anon key otherwise.

pub mod auth;
pub mod query;
pub mod realtime;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, watch};

use crate::{
    config::Config,
    error::backend::BackendError,
    model::auth::{AuthEvent, AuthSession},
};

/// Capacity of the auth event channel. Slow listeners skip to the latest events.
const AUTH_EVENT_CAPACITY: usize = 32;

#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: watch::Sender<Option<AuthSession>>,
    auth_events: broadcast::Sender<AuthEvent>,
}

impl BackendClient {
    /// Creates a new instance of [`BackendClient`]
    pub fn new(config: &Config) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Creates a client reusing an existing [`reqwest::Client`]
    pub fn with_http_client(http: reqwest::Client, config: &Config) -> Self {
        let (session, _) = watch::channel(None);
        let (auth_events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);

        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.backend_url.trim_end_matches('/').to_string(),
                anon_key: config.anon_key.clone(),
                session,
                auth_events,
            }),
        }
    }

    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    /// Start a query against a table or view.
    pub fn from(&self, table: &str) -> query::TableQuery<'_> {
        query::TableQuery::new(self, table)
    }

    pub fn realtime(&self) -> realtime::RealtimeClient {
        realtime::RealtimeClient::new(self.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn anon_key(&self) -> &str {
        &self.inner.anon_key
    }

    /// The current auth session, if signed in.
    pub fn session(&self) -> Option<AuthSession> {
        self.inner.session.borrow().clone()
    }

    /// Bearer token for REST and realtime calls.
    pub fn access_token(&self) -> String {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
            .unwrap_or_else(|| self.inner.anon_key.clone())
    }

    /// Install a session obtained elsewhere, e.g. restored from storage.
    ///
    /// Emits [`AuthEvent::SignedIn`] so listeners load the profile.
    pub fn set_session(&self, session: AuthSession) {
        self.inner.session.send_replace(Some(session.clone()));
        self.emit(AuthEvent::SignedIn(session));
    }

    pub(crate) fn clear_session(&self) {
        self.inner.session.send_replace(None);
    }

    /// Receive auth-state notifications emitted after this call.
    pub fn subscribe_auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.auth_events.subscribe()
    }

    pub(crate) fn emit(&self, event: AuthEvent) {
        // No receivers is fine: nothing is listening yet.
        let _ = self.inner.auth_events.send(event);
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Add the API key and bearer token headers to a request.
    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(self.access_token())
    }

    /// Parse a response body, converting non-success statuses to [`BackendError::Api`].
    pub(crate) async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let body = Self::ensure_success(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Return the body of a successful response.
    pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::from_response_body(status.as_u16(), &body));
        }

        Ok(body)
    }
}
