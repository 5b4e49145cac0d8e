use thiserror::Error;

use crate::repository::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// A technical name or item name is already taken.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The request is well-formed but violates a domain rule.
    #[error("{0}")]
    Validation(String),
    /// The submitted form could not be turned into a payload.
    #[error("{0}")]
    Form(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Map a repository failure, logging anything that is not a caller error.
    pub fn from_repository(action: &str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => {
                log::error!("Failed to {action}: {other}");
                Self::Internal
            }
        }
    }
}
