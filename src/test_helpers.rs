//! Shared test utilities for the weather-gen test suite.
//!
//! Provides fixture writers for real image files on disk and small lookup
//! helpers for the directories the generator reads and writes.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let input = tmp.path().join("input-test");
//! std::fs::create_dir_all(&input).unwrap();
//! create_test_jpeg(&input.join("beach.jpg"), 64, 48);
//! write_garbage(&input.join("corrupt.dat"));
//!
//! assert_eq!(list_names(&input), vec!["beach.jpg", "corrupt.dat"]);
//! ```

use image::{ImageEncoder, Rgb, RgbImage};
use std::path::Path;

// =========================================================================
// Fixture writers
// =========================================================================

/// Gradient test pattern; busy enough for every effect to leave a mark.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a JPEG whose EXIF block carries `orientation` (1-8).
///
/// The pixels are stored as `width`×`height`; a viewer honouring the tag
/// shows them rotated or flipped.
pub fn create_oriented_jpeg(path: &Path, width: u32, height: u32, orientation: u16) {
    let img = gradient(width, height);
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();

    // Big-endian TIFF header, one IFD entry: 0x0112 Orientation, SHORT, count 1
    let mut exif = b"Exif\0\0MM\0\x2a\0\0\0\x08\0\x01\x01\x12\0\x03\0\0\0\x01".to_vec();
    exif.extend_from_slice(&orientation.to_be_bytes());
    exif.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

    let mut app1 = vec![0xFF, 0xE1];
    app1.extend_from_slice(&(exif.len() as u16 + 2).to_be_bytes());
    app1.extend_from_slice(&exif);

    // Right after SOI
    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&app1);
    bytes.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, bytes).unwrap();
}

/// Create a small valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

/// Write bytes no decoder recognises.
pub fn write_garbage(path: &Path) {
    std::fs::write(path, b"definitely not an image\x00\x01\x02").unwrap();
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Sorted file names in `dir`.
pub fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
