use thiserror::Error;

use crate::store::StoreError;

/// Failures reported by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotTeamMember(String),

    #[error("{0}")]
    DeletionNotAllowed(String),

    #[error("Password does not match the one stored")]
    PasswordMismatch,

    #[error("{0}")]
    InvalidInput(String),

    #[error("document store error: {0}")]
    Store(#[from] StoreError),

    #[error("password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("{0} used before wiring")]
    Unwired(&'static str),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn user_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("User with ID: {} doesn't exist", id))
    }

    pub fn team_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Team with ID: {} doesn't exist", id))
    }

    pub fn task_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Task with ID: {} doesn't exist", id))
    }
}
