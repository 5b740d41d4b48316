//! Image payload encoding
//!
//! The daemon accepts images only as base64 strings embedded in the request
//! body. Callers tag what they hold — raw bytes, an already-encoded string,
//! or a file path — so the encoder never has to guess from string content
//! whether a value is base64 or a resource reference.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::{ClientError, Result};

/// An image reference attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw image bytes held in memory
    Raw(Vec<u8>),
    /// Bytes already encoded as base64; passed through unchanged
    Encoded(String),
    /// Path to an image file, read when the request is shaped
    File(PathBuf),
}

impl ImageSource {
    /// Resolve this reference into a base64 string.
    ///
    /// Only the `File` variant touches the filesystem; a read failure is an
    /// [`ClientError::Encode`].
    pub async fn encode(&self) -> Result<String> {
        match self {
            ImageSource::Encoded(encoded) => Ok(encoded.clone()),
            ImageSource::Raw(bytes) => Ok(STANDARD.encode(bytes)),
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    ClientError::Encode(format!("cannot read {}: {}", path.display(), e))
                })?;
                Ok(STANDARD.encode(bytes))
            }
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Raw(bytes)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::File(path)
    }
}

/// Encode a whole image list, preserving order.
pub(crate) async fn encode_all(images: &[ImageSource]) -> Result<Vec<String>> {
    let mut encoded = Vec::with_capacity(images.len());
    for image in images {
        encoded.push(image.encode().await?);
    }
    Ok(encoded)
}
