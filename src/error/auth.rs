use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("No user profile found")]
    ProfileMissing,
    #[error("Role {0:?} not found in database")]
    RoleNotFound(String),
    #[error("Plan {0:?} not found in database")]
    PlanNotFound(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated | Self::ProfileMissing => ErrorKind::Rejected,
            Self::RoleNotFound(_) | Self::PlanNotFound(_) => ErrorKind::NotFound,
        }
    }
}
