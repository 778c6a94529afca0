use crate::images::ImageStore;

use super::ServiceResult;

/// Returns the bytes of a stored image by its reference name.
pub fn get_image(name: &str, images: &ImageStore) -> ServiceResult<Vec<u8>> {
    let bytes = images.read(name)?;
    log::debug!("Serving image {name} ({} bytes)", bytes.len());
    Ok(bytes)
}
