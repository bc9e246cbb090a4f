//! Connectivity and credential checks behind the diagnostic page.
//!
//! [`Diagnostics`] uses its own [`BackendClient`] so a test sign-in never touches the
//! application's session.

use std::time::Instant;

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    backend::BackendClient,
    config::Config,
    data::reference::ReferenceRepository,
    util::deadline::{with_deadline, Deadline},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticStatus {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticResult {
    pub test: String,
    pub status: DiagnosticStatus,
    pub message: String,
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl DiagnosticResult {
    fn new(test: &str, status: DiagnosticStatus, message: impl Into<String>) -> Self {
        Self {
            test: test.to_string(),
            status,
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == DiagnosticStatus::Success
    }
}

pub struct Diagnostics {
    client: BackendClient,
    config: Config,
}

impl Diagnostics {
    /// Creates a new instance of [`Diagnostics`] with a dedicated client
    pub fn new(config: &Config) -> Self {
        Self {
            client: BackendClient::new(config),
            config: config.clone(),
        }
    }

    /// Run the environment, network and table checks in order.
    pub async fn run(&self) -> Vec<DiagnosticResult> {
        let mut results = self.check_environment();
        results.push(self.check_network().await);
        results.extend(self.check_tables().await);

        results
    }

    /// Validate the backend URL and key without any request.
    pub fn check_environment(&self) -> Vec<DiagnosticResult> {
        let mut results = Vec::new();

        let url = &self.config.backend_url;
        results.push(if url.starts_with("https://") {
            DiagnosticResult::new("Backend URL", DiagnosticStatus::Success, format!("URL: {}", url))
        } else if url.starts_with("http://") {
            DiagnosticResult::new(
                "Backend URL",
                DiagnosticStatus::Info,
                format!("URL is not using HTTPS: {}", url),
            )
        } else {
            DiagnosticResult::new(
                "Backend URL",
                DiagnosticStatus::Error,
                format!("Invalid URL format: {}", url),
            )
        });

        let key_length = self.config.anon_key.len();
        results.push(if self.config.is_configured() {
            DiagnosticResult::new(
                "API key",
                DiagnosticStatus::Success,
                format!("Key present ({} characters)", key_length),
            )
        } else {
            DiagnosticResult::new(
                "API key",
                DiagnosticStatus::Error,
                "Backend URL or key is missing or still a placeholder",
            )
        });

        for issue in self.config.issues() {
            results.push(DiagnosticResult::new(
                "Configuration",
                DiagnosticStatus::Error,
                issue.to_string(),
            ));
        }

        results
    }

    /// Call the auth health endpoint under the connection-test deadline.
    pub async fn check_network(&self) -> DiagnosticResult {
        let limit = self.config.timeouts.connection_test;
        let started = Instant::now();

        let outcome = with_deadline(limit, self.client.auth().health()).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let details = json!({ "elapsed_ms": elapsed_ms });

        match outcome {
            Deadline::Ok(()) => DiagnosticResult::new(
                "Network",
                DiagnosticStatus::Success,
                format!("Backend reachable in {} ms", elapsed_ms),
            ),
            Deadline::Failed(e) => DiagnosticResult::new(
                "Network",
                DiagnosticStatus::Error,
                format!("Backend unreachable: {}", e),
            ),
            Deadline::TimedOut => DiagnosticResult::new(
                "Network",
                DiagnosticStatus::Error,
                format!("No response within {} seconds", limit.as_secs()),
            ),
        }
        .with_details(details)
    }

    /// Read one row from the `role` and `plan` tables.
    pub async fn check_tables(&self) -> Vec<DiagnosticResult> {
        let reference = ReferenceRepository::new(&self.client);

        let roles = match reference.roles(1).await {
            Ok(rows) => DiagnosticResult::new(
                "Table role",
                DiagnosticStatus::Success,
                format!("Readable ({} row(s) sampled)", rows.len()),
            ),
            Err(e) => DiagnosticResult::new("Table role", DiagnosticStatus::Error, e.to_string()),
        };

        let plans = match reference.plans(1).await {
            Ok(rows) => DiagnosticResult::new(
                "Table plan",
                DiagnosticStatus::Success,
                format!("Readable ({} row(s) sampled)", rows.len()),
            ),
            Err(e) => DiagnosticResult::new("Table plan", DiagnosticStatus::Error, e.to_string()),
        };

        vec![roles, plans]
    }

    /// Try the credentials directly, then sign out again.
    pub async fn test_sign_in(&self, email: &str, password: &str) -> DiagnosticResult {
        let limit = self.config.timeouts.sign_in;
        let auth = self.client.auth();

        match with_deadline(limit, auth.sign_in_with_password(email, password)).await {
            Deadline::Ok(session) => {
                let verified = session.user.is_email_verified();
                if let Err(e) = auth.sign_out().await {
                    tracing::warn!(error = %e, "Diagnostic sign-out failed");
                }

                DiagnosticResult::new(
                    "Sign in",
                    DiagnosticStatus::Success,
                    "Credentials accepted",
                )
                .with_details(json!({
                    "user_id": session.user.id,
                    "email_verified": verified,
                }))
            }
            Deadline::Failed(e) => DiagnosticResult::new(
                "Sign in",
                DiagnosticStatus::Error,
                e.user_message(),
            ),
            Deadline::TimedOut => DiagnosticResult::new(
                "Sign in",
                DiagnosticStatus::Error,
                format!("Sign in timed out after {} seconds", limit.as_secs()),
            ),
        }
    }

    /// Startup self-test. Logs the outcome with hints and returns whether the backend
    /// answered.
    pub async fn check_connection(&self) -> bool {
        let result = self.check_network().await;

        if result.is_success() {
            tracing::info!(url = %self.config.backend_url, "{}", result.message);
        } else {
            tracing::error!(url = %self.config.backend_url, "Connection test failed: {}", result.message);
            tracing::error!(
                "Check that the backend URL is correct, the project is not paused and this machine can reach it"
            );
        }

        result.is_success()
    }
}
