use thiserror::Error;

use crate::error::ErrorKind;

/// Reasons the usage gate refuses a new scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Please verify your email address to access security scanning.")]
    EmailNotVerified,
    #[error("Usage information is not available yet. Please try again shortly.")]
    StatsUnavailable,
    #[error("Daily limit reached. Upgrade for more scans.")]
    LimitReached,
}

impl UsageError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Rejected
    }
}
