//! Error types for the WebLink Shield account shell.
//!
//! This module aggregates the domain-specific error types (configuration, backend
//! requests, authentication/profile state) into a single [`Error`]. Every error can be
//! classified into an [`ErrorKind`] and rendered as the single banner message shown by
//! the UI via [`Error::user_message`]; nothing is thrown to a global handler.

pub mod auth;
pub mod backend;
pub mod config;
pub mod usage;

use std::{collections::BTreeMap, time::Duration};

use thiserror::Error;

use crate::error::{
    auth::AuthError, backend::BackendError, config::ConfigError, usage::UsageError,
};

/// Per-field validation messages keyed by form field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Main error type for the account shell.
///
/// Uses `thiserror`'s `#[from]` attribute so the `?` operator converts the domain
/// errors automatically.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing, placeholder or invalid environment values).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Error returned by, or while talking to, the hosted backend.
    #[error(transparent)]
    BackendError(#[from] BackendError),
    /// Authentication or profile state error.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// The usage gate refused a scan.
    #[error(transparent)]
    UsageError(#[from] UsageError),
    /// An operation did not complete before its deadline.
    #[error("{operation} timed out after {} seconds", .after.as_secs())]
    Timeout {
        /// Human readable name of the operation, e.g. "Sign in".
        operation: &'static str,
        /// The deadline that elapsed.
        after: Duration,
    },
    /// Input failed validation before any request was made.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),
}

/// Coarse classification used to pick the banner message and log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The deadline for a remote call elapsed.
    Timeout,
    /// Network failure or misconfigured backend.
    Connectivity,
    /// Invalid user input, caught before any network call.
    Validation,
    /// The backend answered but refused the request (bad credentials, RLS denial,
    /// duplicate row).
    Rejected,
    /// No matching row. Benign: triggers a bootstrap or an empty state.
    NotFound,
}

impl Error {
    /// Classify the error for display and logging.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Validation(_) => ErrorKind::Validation,
            Self::ConfigError(_) => ErrorKind::Connectivity,
            Self::BackendError(err) => err.kind(),
            Self::AuthError(err) => err.kind(),
            Self::UsageError(err) => err.kind(),
        }
    }

    /// Message suitable for the single error banner shown by the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout { after, .. } => format!(
                "Request timed out after {} seconds. Please check your internet connection and try again.",
                after.as_secs()
            ),
            Self::Validation(_) => "Please correct the highlighted fields.".to_string(),
            Self::ConfigError(_) => {
                "Unable to connect to authentication service. Please check your configuration."
                    .to_string()
            }
            Self::BackendError(err) => err.user_message(),
            Self::AuthError(err) => err.to_string(),
            Self::UsageError(err) => err.to_string(),
        }
    }

    /// Field-level messages when this is a validation error.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
