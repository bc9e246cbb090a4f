use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata stored on the identity at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// An authenticated principal owned by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Identity {
    pub fn is_email_verified(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

/// Tokens issued by the auth service for a signed-in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: Identity,
}

/// Result of a sign-up call.
///
/// `session` is only present when the service does not require email confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpResponse {
    pub identity: Option<Identity>,
    pub session: Option<AuthSession>,
}

/// Auth-state notifications, the single source of truth for session transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    SignedOut,
    UserUpdated(Identity),
}

/// Profile details collected by the sign-up form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpDetails {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl From<&SignUpDetails> for UserMetadata {
    fn from(details: &SignUpDetails) -> Self {
        Self {
            first_name: Some(details.first_name.clone()),
            last_name: Some(details.last_name.clone()),
            username: Some(details.username.clone()),
        }
    }
}
