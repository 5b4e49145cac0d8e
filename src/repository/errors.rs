use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The addressed row does not exist.
    #[error("entity not found")]
    NotFound,
    /// A unique constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A stored value violates a domain constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("database error: {0}")]
    DatabaseError(DieselError),
}

/// Convenient alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            other => Self::DatabaseError(other),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::ConnectionError(err.to_string())
    }
}
