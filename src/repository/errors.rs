use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors raised by the data store gateway.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("database error: {0}")]
    Database(DieselError),
    /// A unique index rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// A foreign key rejected the write.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    /// A stored row could not be converted into a domain value.
    #[error("invalid stored value: {0}")]
    ValidationError(String),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
