use thiserror::Error;

/// Problems detected while reading backend configuration.
///
/// These are collected and logged rather than returned as failures: the application
/// still starts with a non-functional backend client so the marketing pages render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Environment variable {0} still contains a placeholder value")]
    PlaceholderEnvValue(String),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}
