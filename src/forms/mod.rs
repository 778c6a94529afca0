use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod categories;
pub mod products;

/// Rejection produced while turning a submitted form into a typed payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("form validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("{0} is required")]
    Missing(&'static str),
}

impl FormError {
    /// Human-readable messages, one per failing field.
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages,
            other => vec![other.to_string()],
        }
    }
}

impl From<ValidationErrors> for FormError {
    fn from(value: ValidationErrors) -> Self {
        let mut messages: Vec<String> = value
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages)
    }
}

impl From<TypeConstraintError> for FormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Treats blank optional strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn default_status() -> bool {
    true
}
