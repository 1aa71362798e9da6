//! Fog: translucent white haze discs composited in rings around the centre,
//! then softened with a box blur.
//!
//! The haze layout is sampled first ([`sample_layout`]) and drawn second
//! ([`render`]) so the drawing is deterministic and testable on its own.

use super::blur::box_blur;
use super::params::FogParams;
use image::{Rgb, RgbImage};
use rand::Rng;

/// Smallest haze disc diameter used when drawing.
const MIN_HAZE_WIDTH: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FogLayout {
    pub fog_coef: f32,
    /// Top-left corners of the haze cells.
    pub haze: Vec<(i32, i32)>,
}

/// Base haze cell width for an image of `width` pixels at density `fog_coef`.
fn haze_width(width: u32, fog_coef: f32) -> u32 {
    ((width / 3) as f32 * fog_coef) as u32
}

pub fn sample_layout(width: u32, height: u32, params: &FogParams, rng: &mut impl Rng) -> FogLayout {
    let fog_coef = rng.random_range(params.fog_coef.lower..=params.fog_coef.upper);
    let hw = haze_width(width, fog_coef).max(1) as i64;
    let (w, h) = (width as i64, height as i64);
    let extent = w + h + 3;
    let step_x = (3 * hw * w / extent).max(1);
    let step_y = (3 * hw * h / extent).max(1);

    let mut haze = Vec::new();
    let mut mid_x = w / 2 - 2 * hw;
    let mut mid_y = h / 2 - hw;
    let mut ring = 1;
    while mid_x > -hw || mid_y > -hw {
        for _ in 0..(hw / 10 * ring) {
            let x = sample_between(rng, mid_x, w - mid_x - hw);
            let y = sample_between(rng, mid_y, h - mid_y - hw);
            haze.push((x as i32, y as i32));
        }
        mid_x -= step_x;
        mid_y -= step_y;
        ring += 1;
    }

    FogLayout { fog_coef, haze }
}

fn sample_between(rng: &mut impl Rng, a: i64, b: i64) -> i64 {
    rng.random_range(a.min(b)..=a.max(b))
}

pub fn fog(image: &RgbImage, params: &FogParams, rng: &mut impl Rng) -> RgbImage {
    let layout = sample_layout(image.width(), image.height(), params, rng);
    render(image, params, &layout)
}

pub fn render(image: &RgbImage, params: &FogParams, layout: &FogLayout) -> RgbImage {
    let hw = haze_width(image.width(), layout.fog_coef).max(MIN_HAZE_WIDTH);
    let alpha = (params.alpha_coef * layout.fog_coef).clamp(0.0, 1.0);
    let radius = (hw / 2) as i32;

    let mut out = image.clone();
    for &(x, y) in &layout.haze {
        let center = (x + radius, y + radius);
        blend_disc(&mut out, center, radius, alpha);
    }
    log::debug!(
        "fog: coef {:.3}, {} haze discs, alpha {alpha:.3}",
        layout.fog_coef,
        layout.haze.len()
    );

    box_blur(&out, hw / 10)
}

/// Blend a filled white disc into `image` at opacity `alpha`.
fn blend_disc(image: &mut RgbImage, center: (i32, i32), radius: i32, alpha: f32) {
    let (width, height) = (image.width() as i32, image.height() as i32);
    let r2 = (radius as i64) * (radius as i64);
    let y0 = (center.1 - radius).max(0);
    let y1 = (center.1 + radius).min(height - 1);
    let x0 = (center.0 - radius).max(0);
    let x1 = (center.0 + radius).min(width - 1);
    for y in y0..=y1 {
        let dy = (y - center.1) as i64;
        for x in x0..=x1 {
            let dx = (x - center.0) as i64;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let Rgb(px) = image.get_pixel(x as u32, y as u32);
            let blended = px.map(|c| (255.0 * alpha + c as f32 * (1.0 - alpha)).round() as u8);
            image.put_pixel(x as u32, y as u32, Rgb(blended));
        }
    }
}
