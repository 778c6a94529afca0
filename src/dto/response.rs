//! Uniform response envelope returned to callers of the catalog core.

use serde::{Deserialize, Serialize};

use crate::services::{ServiceError, ServiceResult};

/// Outcome code carried by every [`Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    Success,
    BadRequest,
    NotFound,
    ServerError,
}

/// Tagged success/failure envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Response<T> {
    Success {
        code: ResponseCode,
        message: String,
        data: T,
    },
    Failure {
        code: ResponseCode,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        errors: Option<Vec<String>>,
    },
}

impl<T> Response<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::Success {
            code: ResponseCode::Success,
            message: message.into(),
            data,
        }
    }

    pub fn failure(code: ResponseCode, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
            errors: None,
        }
    }

    /// Wraps a service result, using `message` for the success case.
    pub fn from_result(result: ServiceResult<T>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::success(data, message),
            Err(err) => err.into(),
        }
    }

    pub fn code(&self) -> ResponseCode {
        match self {
            Self::Success { code, .. } | Self::Failure { code, .. } => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code() == ResponseCode::Success
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }
}

impl<T> From<ServiceError> for Response<T> {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(messages) => Self::Failure {
                code: ResponseCode::BadRequest,
                message: "invalid data".to_string(),
                errors: Some(messages),
            },
            ServiceError::BadRequest(message) | ServiceError::Conflict(message) => {
                Self::failure(ResponseCode::BadRequest, message)
            }
            ServiceError::NotFound(message) => Self::failure(ResponseCode::NotFound, message),
            err @ ServiceError::Decoding(_) => Self::failure(ResponseCode::ServerError, err.to_string()),
            ServiceError::Internal => {
                Self::failure(ResponseCode::ServerError, "internal server error")
            }
        }
    }
}
