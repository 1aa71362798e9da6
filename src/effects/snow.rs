//! Snow: brighten everything darker than a sampled lightness threshold.

use super::color::map_lightness;
use super::params::SnowParams;
use image::RgbImage;
use rand::Rng;

/// Lightness threshold (`0.0..=1.0`) for a sampled snow point.
///
/// The snow point maps onto the upper two thirds of the lightness scale:
/// `snow_point / 2 + 1 / 3`.
pub fn threshold(snow_point: f32) -> f32 {
    snow_point / 2.0 + 1.0 / 3.0
}

pub fn snow(image: &RgbImage, params: &SnowParams, rng: &mut impl Rng) -> RgbImage {
    let snow_point = rng.random_range(params.snow_point.lower..=params.snow_point.upper);
    render(image, params, snow_point)
}

pub fn render(image: &RgbImage, params: &SnowParams, snow_point: f32) -> RgbImage {
    let limit = threshold(snow_point);
    let gain = params.brightness_coeff;
    log::debug!("snow: point {snow_point:.3}, lightness threshold {limit:.3}");
    map_lightness(image, |l| if l < limit { l * gain } else { l })
}
