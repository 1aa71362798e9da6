//! Conversion between decoded images and the RGB8 working buffer the
//! effects operate on.
//!
//! Effects only ever see three 8-bit channels. Anything else the source
//! carried that should survive into the artifact (currently: alpha) is kept
//! in a [`SourceLayout`] and reattached by [`SourceLayout::restore`].

use image::{DynamicImage, GrayImage, Luma, Rgba, RgbImage, RgbaImage};

/// What the working buffer dropped from the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLayout {
    alpha: Option<GrayImage>,
}

impl SourceLayout {
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Rebuild an image in the source layout from an RGB working buffer.
    ///
    /// The working buffer must have the source's dimensions; effects never
    /// resize, so a mismatch means the alpha plane cannot be trusted and is
    /// dropped.
    pub fn restore(&self, rgb: RgbImage) -> DynamicImage {
        match &self.alpha {
            Some(alpha) if alpha.dimensions() == rgb.dimensions() => {
                let rgba = RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                    let [r, g, b] = rgb.get_pixel(x, y).0;
                    let Luma([a]) = *alpha.get_pixel(x, y);
                    Rgba([r, g, b, a])
                });
                DynamicImage::ImageRgba8(rgba)
            }
            Some(_) => {
                log::warn!("working buffer size changed; dropping alpha channel");
                DynamicImage::ImageRgb8(rgb)
            }
            None => DynamicImage::ImageRgb8(rgb),
        }
    }
}

/// Split a decoded image into an RGB8 working buffer and its layout.
///
/// Grayscale and high bit-depth sources are converted to RGB8.
pub fn to_working(image: &DynamicImage) -> (RgbImage, SourceLayout) {
    let alpha = image.color().has_alpha().then(|| {
        let rgba = image.to_rgba8();
        GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            Luma([rgba.get_pixel(x, y)[3]])
        })
    });
    (image.to_rgb8(), SourceLayout { alpha })
}
