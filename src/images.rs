//! Storage of uploaded images as named blobs under a fixed root directory.

use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::ImageName;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid base64 image: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("image payload is empty")]
    Empty,
    #[error("invalid image name: {0}")]
    InvalidName(String),
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("image storage error: {0}")]
    Io(#[from] io::Error),
}

/// Entity an image is being stored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Category,
    Product,
}

impl ImageTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
        }
    }
}

impl Display for ImageTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Writes decoded images below `root` and hands back their file names.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Decodes a base64 payload (optionally wrapped in a `data:` URL), stores
    /// it under a fresh unique name and returns that name.
    ///
    /// Content is not deduplicated and image format is not inspected.
    pub fn ingest(&self, payload: &str, target: ImageTarget) -> Result<ImageName, ImageError> {
        let bytes = decode_payload(payload)?;

        fs::create_dir_all(&self.root)?;
        let file_name = format!("{target}_{}_image.png", Uuid::new_v4());
        fs::write(self.root.join(&file_name), &bytes)?;

        log::info!(
            "Stored {target} image {file_name} ({} bytes)",
            bytes.len()
        );
        ImageName::new(file_name).map_err(|e| ImageError::InvalidName(e.to_string()))
    }

    /// Reads a previously stored image by its reference name.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, ImageError> {
        let path = self.resolve(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ImageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a stored image. An already missing file is not an error.
    pub fn discard(&self, name: &ImageName) -> Result<(), ImageError> {
        let path = self.resolve(name.as_str())?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed image {name}");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Only bare file names are accepted so lookups cannot leave the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, ImageError> {
        let is_plain = !name.is_empty()
            && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
            && name != "."
            && name != "..";
        if is_plain {
            Ok(self.root.join(name))
        } else {
            Err(ImageError::InvalidName(name.to_string()))
        }
    }
}

fn decode_payload(payload: &str) -> Result<Vec<u8>, ImageError> {
    let payload = payload.trim();
    let encoded = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    let bytes = general_purpose::STANDARD.decode(encoded)?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    Ok(bytes)
}
