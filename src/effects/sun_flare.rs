//! Sun glare: a radial light source plus a string of translucent flare
//! circles along a random line through it.
//!
//! Circle centres are picked from points every [`AXIS_STEP`] pixels across
//! the image width on the line `y = 2·cy − (tan(angle)·(x − cx) + cy)`, the
//! mirror image about `y = cy` of the slope line through the source, so with
//! y growing downward a small positive angle rises to the right.
//!
//! Compositing follows the overlay model: shapes are painted opaquely onto an
//! overlay that keeps accumulating, and after each shape the overlay is
//! blended onto the output at that shape's opacity. Only the region touched by
//! shapes so far can differ between overlay and output, so blending is
//! restricted to that rectangle.

use super::params::SunFlareParams;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use rand::Rng;
use std::f32::consts::PI;

/// Horizontal spacing (pixels) between candidate circle positions on the flare line.
const AXIS_STEP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlareCircle {
    pub alpha: f32,
    pub center: (i32, i32),
    pub radius: i32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlareLayout {
    pub center: (i32, i32),
    pub circles: Vec<FlareCircle>,
}

pub fn sample_layout(
    width: u32,
    height: u32,
    params: &SunFlareParams,
    rng: &mut impl Rng,
) -> FlareLayout {
    let angle = 2.0 * PI * rng.random_range(params.angle.lower..=params.angle.upper);
    let roi = params.flare_roi;
    let cx = (width as f32 * rng.random_range(roi.x_min..=roi.x_max)) as i32;
    let cy = (height as f32 * rng.random_range(roi.y_min..=roi.y_max)) as i32;
    let count =
        rng.random_range(params.num_flare_circles.lower..=params.num_flare_circles.upper);

    let max_size = (height as i32 / 100 - 2).max(2);
    // A centre further off-canvas than the largest radius draws nothing, and
    // steep angles would otherwise overflow the integer rasteriser.
    let reach = height as f32 + max_size.pow(3) as f32;
    let slope = angle.tan();
    let line: Vec<(i32, i32)> = (0..width as i32)
        .step_by(AXIS_STEP)
        .map(|x| {
            let y = 2.0 * cy as f32 - (slope * (x - cx) as f32 + cy as f32);
            (x, y.clamp(-reach, reach) as i32)
        })
        .collect();

    let mut circles = Vec::with_capacity(count as usize);
    if !line.is_empty() {
        for _ in 0..count {
            let alpha = rng.random_range(0.05..=0.2);
            let (x, y) = line[rng.random_range(0..line.len())];
            let size = rng.random_range(1..=max_size);
            let color = params
                .src_color
                .map(|c| rng.random_range(c.saturating_sub(50)..=c));
            circles.push(FlareCircle {
                alpha,
                center: (x, y),
                radius: size.pow(3),
                color,
            });
        }
    }

    FlareLayout {
        center: (cx, cy),
        circles,
    }
}

pub fn sun_flare(image: &RgbImage, params: &SunFlareParams, rng: &mut impl Rng) -> RgbImage {
    let layout = sample_layout(image.width(), image.height(), params, rng);
    render(image, params, &layout)
}

pub fn render(image: &RgbImage, params: &SunFlareParams, layout: &FlareLayout) -> RgbImage {
    let mut output = image.clone();
    let mut overlay = image.clone();
    let mut dirty = DirtyRect::default();

    for circle in &layout.circles {
        draw_filled_circle_mut(&mut overlay, circle.center, circle.radius, Rgb(circle.color));
        dirty.include(circle.center, circle.radius);
        blend(&overlay, &mut output, circle.alpha, &dirty);
    }

    let steps = (params.src_radius / 10) as usize;
    let mut overlay = output.clone();
    let mut dirty = DirtyRect::default();
    for i in 0..steps {
        let radius = linspace(1.0, params.src_radius as f32, steps, i) as i32;
        let a = linspace(0.0, 1.0, steps, steps - i - 1);
        draw_filled_circle_mut(&mut overlay, layout.center, radius, Rgb(params.src_color));
        dirty.include(layout.center, radius);
        blend(&overlay, &mut output, a * a * a, &dirty);
    }
    log::debug!(
        "sun flare at {:?}: {} circles, {steps} source rings",
        layout.center,
        layout.circles.len()
    );

    output
}

/// `i`-th of `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f32, end: f32, n: usize, i: usize) -> f32 {
    if n <= 1 {
        return start;
    }
    start + (end - start) * i as f32 / (n - 1) as f32
}

/// Bounding box of everything painted onto an overlay so far.
#[derive(Debug, Default, Clone, Copy)]
struct DirtyRect {
    bounds: Option<(i64, i64, i64, i64)>,
}

impl DirtyRect {
    fn include(&mut self, center: (i32, i32), radius: i32) {
        let (cx, cy, r) = (center.0 as i64, center.1 as i64, radius.max(0) as i64);
        let next = (cx - r, cy - r, cx + r, cy + r);
        self.bounds = Some(match self.bounds {
            None => next,
            Some((x0, y0, x1, y1)) => (x0.min(next.0), y0.min(next.1), x1.max(next.2), y1.max(next.3)),
        });
    }

    /// Clip to an image, returning inclusive pixel bounds if anything overlaps.
    fn clip(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let (x0, y0, x1, y1) = self.bounds?;
        let (w, h) = (width as i64, height as i64);
        if w == 0 || h == 0 || x1 < 0 || y1 < 0 || x0 >= w || y0 >= h {
            return None;
        }
        Some((
            x0.max(0) as u32,
            y0.max(0) as u32,
            x1.min(w - 1) as u32,
            y1.min(h - 1) as u32,
        ))
    }
}

/// `output = overlay * alpha + output * (1 - alpha)` inside `dirty`.
fn blend(overlay: &RgbImage, output: &mut RgbImage, alpha: f32, dirty: &DirtyRect) {
    let Some((x0, y0, x1, y1)) = dirty.clip(output.width(), output.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let top = overlay.get_pixel(x, y);
            let bottom = output.get_pixel_mut(x, y);
            for c in 0..3 {
                let v = top[c] as f32 * alpha + bottom[c] as f32 * (1.0 - alpha);
                bottom[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
