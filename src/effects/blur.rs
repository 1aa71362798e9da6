//! Box blur and motion blur.

use super::params::MotionBlurParams;
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use rand::Rng;

/// Square box blur with a `size`×`size` window. Sizes below 2 are a no-op.
pub fn box_blur(image: &RgbImage, size: u32) -> RgbImage {
    if size < 2 {
        return image.clone();
    }
    let radius = size / 2;
    let (width, height) = image.dimensions();
    let channels: Vec<GrayImage> = (0..3)
        .map(|c| {
            let plane = GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[c]]));
            imageproc::filter::box_filter(&plane, radius, radius)
        })
        .collect();
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            channels[0].get_pixel(x, y)[0],
            channels[1].get_pixel(x, y)[0],
            channels[2].get_pixel(x, y)[0],
        ])
    })
}

/// A normalised square convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: u32,
    weights: Vec<f32>,
}

impl Kernel {
    pub fn weight(&self, x: u32, y: u32) -> f32 {
        self.weights[(y * self.size + x) as usize]
    }
}

/// Build a random motion kernel: a single line across a `size`×`size` grid.
pub fn motion_kernel(size: u32, rng: &mut impl Rng) -> Kernel {
    let last = size as i32 - 1;
    let (xs, xe) = (rng.random_range(0..=last), rng.random_range(0..=last));
    let (ys, ye) = if xs == xe {
        // Vertical line: endpoints must differ or the kernel collapses to a dot.
        let ys = rng.random_range(0..=last);
        let mut ye = rng.random_range(0..last);
        if ye >= ys {
            ye += 1;
        }
        (ys, ye)
    } else {
        (rng.random_range(0..=last), rng.random_range(0..=last))
    };

    let mut grid: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::new(size, size);
    draw_line_segment_mut(
        &mut grid,
        (xs as f32, ys as f32),
        (xe as f32, ye as f32),
        Luma([1.0]),
    );
    let mut weights = grid.into_raw();
    let total: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    Kernel { size, weights }
}

/// Convolve with reflect-101 borders (`dcb|abcd|cba`).
pub fn convolve(image: &RgbImage, kernel: &Kernel) -> RgbImage {
    let (width, height) = image.dimensions();
    let half = (kernel.size / 2) as i64;
    RgbImage::from_fn(width, height, |x, y| {
        let mut acc = [0.0f32; 3];
        for ky in 0..kernel.size {
            let sy = reflect101(y as i64 + ky as i64 - half, height);
            for kx in 0..kernel.size {
                let w = kernel.weight(kx, ky);
                if w == 0.0 {
                    continue;
                }
                let sx = reflect101(x as i64 + kx as i64 - half, width);
                let p = image.get_pixel(sx, sy);
                for c in 0..3 {
                    acc[c] += w * p[c] as f32;
                }
            }
        }
        Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

fn reflect101(i: i64, len: u32) -> u32 {
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let i = i.rem_euclid(period);
    (if i < n { i } else { period - i }) as u32
}

/// Apply a motion blur with an odd kernel size sampled from `3..=blur_limit`.
pub fn motion_blur(image: &RgbImage, params: &MotionBlurParams, rng: &mut impl Rng) -> RgbImage {
    let max_size = params.blur_limit.max(3);
    let choices = (max_size - 3) / 2 + 1;
    let size = 3 + 2 * rng.random_range(0..choices);
    let kernel = motion_kernel(size, rng);
    log::debug!("motion blur with {size}x{size} kernel");
    convolve(image, &kernel)
}
