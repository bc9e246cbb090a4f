use dioxus_logger::tracing;
use serde::Deserialize;
use serde_json::json;

use crate::{
    backend::BackendClient,
    error::backend::BackendError,
    model::auth::{AuthEvent, AuthSession, Identity, SignUpDetails, SignUpResponse, UserMetadata},
};

/// Password auth endpoints of the hosted auth service.
pub struct AuthApi<'a> {
    client: &'a BackendClient,
}

/// The sign-up endpoint answers with a session when confirmation is disabled and with the
/// bare identity otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(AuthSession),
    Identity(Identity),
}

impl<'a> AuthApi<'a> {
    /// Creates a new instance of [`AuthApi`]
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    fn endpoint(&self, path: &str) -> String {
        self.client.url(&format!("/auth/v1/{}", path))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .http()
            .request(method, self.endpoint(path))
            .header("apikey", self.client.anon_key())
    }

    /// Exchange email and password for a session.
    ///
    /// On success the session is stored on the client and [`AuthEvent::SignedIn`] is
    /// emitted.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "token?grant_type=password")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: AuthSession = BackendClient::parse_response(response).await?;

        tracing::debug!(auth_user_id = %session.user.id, "Password sign-in accepted");

        self.client.set_session(session.clone());

        Ok(session)
    }

    /// Create a new identity with profile metadata.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        details: &SignUpDetails,
    ) -> Result<SignUpResponse, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "signup")
            .json(&json!({
                "email": email,
                "password": password,
                "data": UserMetadata::from(details),
            }))
            .send()
            .await?;

        let body: SignUpBody = BackendClient::parse_response(response).await?;

        Ok(match body {
            SignUpBody::Session(session) => {
                self.client.set_session(session.clone());

                SignUpResponse {
                    identity: Some(session.user.clone()),
                    session: Some(session),
                }
            }
            SignUpBody::Identity(identity) => SignUpResponse {
                identity: Some(identity),
                session: None,
            },
        })
    }

    /// Revoke the current session.
    ///
    /// Local session state is always cleared and [`AuthEvent::SignedOut`] emitted, even
    /// when the server call fails.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        let result = match self.client.session() {
            Some(session) => {
                let response = self
                    .request(reqwest::Method::POST, "logout")
                    .bearer_auth(&session.access_token)
                    .send()
                    .await;

                match response {
                    Ok(response) => BackendClient::ensure_success(response).await.map(|_| ()),
                    Err(e) => Err(e.into()),
                }
            }
            None => Ok(()),
        };

        self.client.clear_session();
        self.client.emit(AuthEvent::SignedOut);

        result
    }

    /// Send a password recovery email.
    pub async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), BackendError> {
        let mut request = self.request(reqwest::Method::POST, "recover");
        if let Some(redirect_to) = redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }

        let response = request.json(&json!({ "email": email })).send().await?;

        BackendClient::ensure_success(response).await?;

        Ok(())
    }

    /// Resend the sign-up confirmation email.
    pub async fn resend_signup_verification(&self, email: &str) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST, "resend")
            .json(&json!({ "type": "signup", "email": email }))
            .send()
            .await?;

        BackendClient::ensure_success(response).await?;

        Ok(())
    }

    /// Fetch the identity for the current session.
    pub async fn get_user(&self) -> Result<Identity, BackendError> {
        let response = self
            .request(reqwest::Method::GET, "user")
            .bearer_auth(self.client.access_token())
            .send()
            .await?;

        let identity: Identity = BackendClient::parse_response(response).await?;

        self.client.emit(AuthEvent::UserUpdated(identity.clone()));

        Ok(identity)
    }

    /// Check that the auth service is reachable.
    pub async fn health(&self) -> Result<(), BackendError> {
        let response = self.request(reqwest::Method::GET, "health").send().await?;

        BackendClient::ensure_success(response).await?;

        Ok(())
    }
}
