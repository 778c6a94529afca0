use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The payload failed validation; one message per offending field.
    #[error("invalid data: {}", .0.join("; "))]
    Validation(Vec<String>),
    /// The request is malformed or refers to a missing identifier.
    #[error("{0}")]
    BadRequest(String),
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// The write would duplicate an existing record.
    #[error("{0}")]
    Conflict(String),
    /// An embedded image could not be decoded.
    #[error("image could not be decoded: {0}")]
    Decoding(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
