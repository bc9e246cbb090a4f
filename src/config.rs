//! Backend configuration loaded from the environment.
//!
//! Two values are required: the backend service URL and its public (anon) API key.
//! Missing or placeholder values are detected and logged but never fatal; the client
//! falls back to placeholder values so the marketing pages still render.

use std::time::Duration;

use dioxus_logger::tracing;

use crate::error::config::ConfigError;

pub const BACKEND_URL_VAR: &str = "BACKEND_URL";
pub const BACKEND_ANON_KEY_VAR: &str = "BACKEND_ANON_KEY";
pub const SITE_URL_VAR: &str = "SITE_URL";
pub const SIGN_IN_TIMEOUT_VAR: &str = "BACKEND_SIGN_IN_TIMEOUT_SECS";
pub const SIGN_UP_TIMEOUT_VAR: &str = "BACKEND_SIGN_UP_TIMEOUT_SECS";
pub const PROFILE_TIMEOUT_VAR: &str = "BACKEND_PROFILE_TIMEOUT_SECS";

pub const PLACEHOLDER_URL: &str = "https://placeholder.backend.invalid";
pub const PLACEHOLDER_KEY: &str = "placeholder-key";

/// Deadlines applied to externally bound calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    pub sign_in: Duration,
    pub sign_up: Duration,
    pub profile_creation: Duration,
    pub connection_test: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            sign_in: Duration::from_secs(10),
            sign_up: Duration::from_secs(15),
            profile_creation: Duration::from_secs(10),
            connection_test: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub anon_key: String,
    /// Public origin of the site, used for password reset redirects.
    pub site_url: Option<String>,
    pub timeouts: Timeouts,
    issues: Vec<ConfigError>,
}

impl Config {
    /// Build a configuration from explicit values, with default timeouts.
    pub fn new(backend_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            site_url: None,
            timeouts: Timeouts::default(),
            issues: Vec::new(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Read configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues = Vec::new();

        let backend_url = required_value(&lookup, BACKEND_URL_VAR, &mut issues)
            .and_then(|url| match reqwest::Url::parse(&url) {
                Ok(_) => Some(url),
                Err(e) => {
                    issues.push(ConfigError::InvalidEnvValue {
                        var: BACKEND_URL_VAR.to_string(),
                        reason: e.to_string(),
                    });
                    None
                }
            })
            .unwrap_or_else(|| PLACEHOLDER_URL.to_string());

        let anon_key = required_value(&lookup, BACKEND_ANON_KEY_VAR, &mut issues)
            .unwrap_or_else(|| PLACEHOLDER_KEY.to_string());

        let site_url = lookup(SITE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let defaults = Timeouts::default();
        let timeouts = Timeouts {
            sign_in: seconds_value(&lookup, SIGN_IN_TIMEOUT_VAR, &mut issues)
                .unwrap_or(defaults.sign_in),
            sign_up: seconds_value(&lookup, SIGN_UP_TIMEOUT_VAR, &mut issues)
                .unwrap_or(defaults.sign_up),
            profile_creation: seconds_value(&lookup, PROFILE_TIMEOUT_VAR, &mut issues)
                .unwrap_or(defaults.profile_creation),
            connection_test: defaults.connection_test,
        };

        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            anon_key,
            site_url,
            timeouts,
            issues,
        }
    }

    /// Problems found while loading, in the order they were detected.
    pub fn issues(&self) -> &[ConfigError] {
        &self.issues
    }

    /// True when both required values were present and usable.
    pub fn is_configured(&self) -> bool {
        !self.issues.iter().any(|issue| match issue {
            ConfigError::MissingEnvVar(var) | ConfigError::PlaceholderEnvValue(var) => {
                var == BACKEND_URL_VAR || var == BACKEND_ANON_KEY_VAR
            }
            ConfigError::InvalidEnvValue { var, .. } => var == BACKEND_URL_VAR,
        })
    }

    /// Log a summary of the loaded configuration without exposing the key.
    pub fn log_summary(&self) {
        tracing::info!(
            url = %self.backend_url,
            key_length = self.anon_key.len(),
            "Loaded backend configuration"
        );

        for issue in &self.issues {
            tracing::error!("{}", issue);
        }

        if !self.is_configured() {
            tracing::error!(
                "Backend is not configured, set {} and {} in your environment or .env file",
                BACKEND_URL_VAR,
                BACKEND_ANON_KEY_VAR
            );
        }
    }
}

fn required_value<F>(lookup: &F, var: &str, issues: &mut Vec<ConfigError>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var).map(|value| value.trim().to_string()) {
        None => {
            issues.push(ConfigError::MissingEnvVar(var.to_string()));
            None
        }
        Some(value) if value.is_empty() => {
            issues.push(ConfigError::MissingEnvVar(var.to_string()));
            None
        }
        Some(value) if is_placeholder(&value) => {
            issues.push(ConfigError::PlaceholderEnvValue(var.to_string()));
            None
        }
        Some(value) => Some(value),
    }
}

fn seconds_value<F>(lookup: &F, var: &str, issues: &mut Vec<ConfigError>) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var)?;

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        Ok(_) => {
            issues.push(ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
            None
        }
        Err(e) => {
            issues.push(ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Values copied from `.env.example` without being filled in.
fn is_placeholder(value: &str) -> bool {
    value.contains("your_") || value.contains("placeholder")
}
