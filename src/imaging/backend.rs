//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the generator needs
//! from a codec layer: decode a file into pixels, and encode pixels into a
//! file whose format follows its extension.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the recording
//! [`MockBackend`](tests::MockBackend) so pipeline logic can be checked
//! without real codecs.

use super::params::Quality;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl BackendError {
    /// I/O failures abort a batch; everything else is scoped to one file.
    pub fn is_io(&self) -> bool {
        matches!(self, BackendError::Io(_))
    }
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Read and decode an image, detecting the format from its content.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` to `path`, choosing the format from the extension.
    /// An existing file is overwritten.
    fn encode(&self, image: &DynamicImage, path: &Path, quality: Quality)
    -> Result<(), BackendError>;
}
