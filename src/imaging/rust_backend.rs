//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, BMP) | `ImageReader::with_guessed_format` (content sniffing, extension fallback) |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with explicit quality |
//! | Encode → PNG, TIFF, WebP, BMP | `DynamicImage::write_to` (lossless) |
//!
//! Decoded images come back upright: the EXIF orientation tag is applied at
//! decode time, because encoding writes no metadata and a rotated-by-tag
//! phone photo would otherwise come out sideways.
//!
//! Encoding happens in memory first, so a failed encode never leaves a
//! truncated file behind and a write failure is always an I/O error.

use super::backend::{BackendError, ImageBackend};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Output format for `path`, if its extension names a format we can write.
pub fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    ImageFormat::from_extension(ext)
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| {
            BackendError::UnsupportedFormat(format!("{} (extension {ext:?})", path.display()))
        })
}

fn decode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::Decode(format!("{}: {}", path.display(), other)),
    }
}

fn encode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::Encode(format!("{}: {}", path.display(), other)),
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        let mut decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let orientation = decoder.orientation().map_err(|e| decode_error(path, e))?;
        let mut image = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
        image.apply_orientation(orientation);
        Ok(image)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let format = output_format(path)?;
        let mut buffer = Cursor::new(Vec::new());

        let encoded = match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.value() as u8);
                DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
            }
            other => image.write_to(&mut buffer, other),
        };
        encoded.map_err(|e| encode_error(path, e))?;

        std::fs::write(path, buffer.into_inner())?;
        Ok(())
    }
}
