//! Domain errors

use sso_security::PasswordError;
use thiserror::Error;

use crate::repositories::StoreError;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification handed to the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Store,
    Serialization,
    Internal,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::UserNotFound(_) | DomainError::SessionNotFound(_) => ErrorKind::NotFound,
            DomainError::UsernameTaken(_) => ErrorKind::Conflict,
            DomainError::ValidationError(_) => ErrorKind::Validation,
            DomainError::StoreError(_) => ErrorKind::Store,
            DomainError::SerializationError(_) => ErrorKind::Serialization,
            DomainError::PasswordHashError(_) | DomainError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Expected outcome, not an anomaly: callers must not alert on it.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<PasswordError> for DomainError {
    fn from(error: PasswordError) -> Self {
        match error {
            PasswordError::HashError(msg) => DomainError::PasswordHashError(msg),
            PasswordError::TooLong | PasswordError::MalformedHash(_) => {
                DomainError::ValidationError(error.to_string())
            }
        }
    }
}
