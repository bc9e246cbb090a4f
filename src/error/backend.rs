use serde::Deserialize;
use thiserror::Error;

use crate::error::ErrorKind;

/// Error code returned by the REST layer when a single-row read matched no rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request to backend failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Backend rejected request with status {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Realtime connection error: {0}")]
    Realtime(String),
}

/// Error body shapes returned by the auth and REST services.
///
/// The REST layer answers with `{code, message, details, hint}` while the auth service
/// has used both `{error, error_description}` and `{code, error_code, msg}` over time, so
/// every field is optional and [`ApiErrorBody::message`] picks the most specific one.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
    }

    /// The machine readable code, if any. Numeric HTTP-style codes are ignored.
    pub fn code(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            _ => self.error_code.clone(),
        }
    }
}

impl BackendError {
    /// Build an [`BackendError::Api`] from a non-success status and raw response body.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ApiErrorBody>(body).unwrap_or_default();
        let message = parsed.message().unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Request failed with status {}", status)
            } else {
                body.to_string()
            }
        });

        Self::Api {
            status,
            code: parsed.code(),
            message,
        }
    }

    /// True when a single-row read found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == NO_ROWS_CODE)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Request(_) | Self::Realtime(_) => ErrorKind::Connectivity,
            Self::Decode(_) => ErrorKind::Rejected,
            err if err.is_not_found() => ErrorKind::NotFound,
            Self::Api { status, .. } if *status >= 500 => ErrorKind::Connectivity,
            Self::Api { .. } => ErrorKind::Rejected,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Request(_) => {
                "Unable to connect to authentication service. Please check your configuration."
                    .to_string()
            }
            Self::Api { message, .. } => message.clone(),
            Self::Decode(_) => "Received an unexpected response from the server.".to_string(),
            Self::Realtime(reason) => format!("Live updates unavailable: {}", reason),
        }
    }
}
