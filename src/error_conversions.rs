//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::FormError;
    use crate::images::ImageError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::Validation(vec![val.to_string()])
        }
    }

    impl From<FormError> for ServiceError {
        fn from(val: FormError) -> Self {
            ServiceError::Validation(val.into_messages())
        }
    }

    impl From<ImageError> for ServiceError {
        fn from(val: ImageError) -> Self {
            match val {
                ImageError::Decode(_) | ImageError::Empty => ServiceError::Decoding(val.to_string()),
                ImageError::InvalidName(_) => ServiceError::BadRequest(val.to_string()),
                ImageError::NotFound(_) => ServiceError::NotFound(val.to_string()),
                ImageError::Io(e) => {
                    log::error!("Image storage failure: {e}");
                    ServiceError::Internal
                }
            }
        }
    }
}
