pub mod categories;
pub mod errors;
pub mod images;
pub mod products;

pub use errors::{ServiceError, ServiceResult};

use crate::domain::types::{ImageName, TypeConstraintError};
use crate::images::ImageStore;

/// Converts an optional raw identifier into a typed one.
///
/// Absent and non-positive values are both reported through `on_missing`,
/// since neither can match a stored record.
pub(crate) fn require_id<T>(
    raw: Option<i32>,
    parse: impl FnOnce(i32) -> Result<T, TypeConstraintError>,
    on_missing: impl FnOnce() -> ServiceError,
) -> ServiceResult<T> {
    raw.and_then(|value| parse(value).ok()).ok_or_else(on_missing)
}

/// Removes an image ingested for a write the store did not accept.
pub(crate) fn discard_image(images: &ImageStore, image: Option<&ImageName>) {
    if let Some(image) = image {
        if let Err(e) = images.discard(image) {
            log::warn!("Failed to remove orphaned image {image}: {e}");
        }
    }
}
