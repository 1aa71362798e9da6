//! Rain: slanted streaks, softened and darkened.

use super::blur::box_blur;
use super::color::map_lightness;
use super::params::RainParams;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use rand::Rng;

/// One drop is drawn per this many pixels of image area.
const PIXELS_PER_DROP: u64 = 600;

/// Top end of a rain streak, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drop {
    pub x: i32,
    pub y: i32,
}

/// Sampled layout for one application of the rain effect.
#[derive(Debug, Clone, PartialEq)]
pub struct RainLayout {
    pub slant: i32,
    pub drops: Vec<Drop>,
}

pub fn sample_layout(width: u32, height: u32, params: &RainParams, rng: &mut impl Rng) -> RainLayout {
    let slant = rng.random_range(params.slant.lower..=params.slant.upper);
    let count = (width as u64 * height as u64 / PIXELS_PER_DROP) as usize;
    let (w, h) = (width as i32, height as i32);
    let max_y = (h - params.drop_length as i32).max(0);

    let drops = (0..count)
        .map(|_| {
            let x = if slant < 0 {
                rng.random_range(slant..=w)
            } else {
                rng.random_range(0..=(w - slant).max(0))
            };
            let y = rng.random_range(0..=max_y);
            Drop { x, y }
        })
        .collect();

    RainLayout { slant, drops }
}

pub fn rain(image: &RgbImage, params: &RainParams, rng: &mut impl Rng) -> RgbImage {
    let layout = sample_layout(image.width(), image.height(), params, rng);
    render(image, params, &layout)
}

/// Draw a sampled layout. Deterministic given the layout.
pub fn render(image: &RgbImage, params: &RainParams, layout: &RainLayout) -> RgbImage {
    let mut out = image.clone();
    let color = Rgb(params.drop_color);
    let length = params.drop_length as f32;
    for drop in &layout.drops {
        for offset in 0..params.drop_width.max(1) as i32 {
            let x = (drop.x + offset) as f32;
            let y = drop.y as f32;
            draw_line_segment_mut(&mut out, (x, y), (x + layout.slant as f32, y + length), color);
        }
    }
    log::debug!(
        "rain: {} drops, slant {}",
        layout.drops.len(),
        layout.slant
    );

    let blurred = box_blur(&out, params.blur_value);
    let coefficient = params.brightness_coefficient;
    map_lightness(&blurred, |l| l * coefficient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::params::Range;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn drop_count_scales_with_area() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = sample_layout(60, 40, &RainParams::default(), &mut rng);
        assert_eq!(layout.drops.len(), 4);

        let layout = sample_layout(10, 10, &RainParams::default(), &mut rng);
        assert!(layout.drops.is_empty());
    }

    #[test]
    fn drops_stay_within_sampling_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let params = RainParams::default();
        for _ in 0..20 {
            let layout = sample_layout(120, 80, &params, &mut rng);
            assert!((-10..=10).contains(&layout.slant));
            for d in &layout.drops {
                assert!(d.y >= 0 && d.y <= 80 - 20);
                if layout.slant < 0 {
                    assert!(d.x >= layout.slant && d.x <= 120);
                } else {
                    assert!(d.x >= 0 && d.x <= 120 - layout.slant);
                }
            }
        }
    }

    #[test]
    fn image_shorter_than_drop_is_handled() {
        let mut rng = StdRng::seed_from_u64(3);
        let layout = sample_layout(1200, 5, &RainParams::default(), &mut rng);
        assert!(layout.drops.iter().all(|d| d.y == 0));
    }

    #[test]
    fn render_draws_streaks_and_darkens() {
        let img = RgbImage::from_pixel(40, 40, Rgb([100, 100, 100]));
        let params = RainParams {
            slant: Range::new(0, 0),
            blur_value: 1,
            ..Default::default()
        };
        let layout = RainLayout {
            slant: 0,
            drops: vec![Drop { x: 10, y: 5 }],
        };
        let out = render(&img, &params, &layout);

        // Streak pixels were drop colour (200) before the 0.9 lightness cut.
        assert_eq!(out.get_pixel(10, 15), &Rgb([180, 180, 180]));
        // Background lightness 100/255 scaled by 0.9.
        assert_eq!(out.get_pixel(30, 30), &Rgb([90, 90, 90]));
    }

    #[test]
    fn rain_preserves_dimensions_and_changes_pixels() {
        let img = RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, 80]));
        let mut rng = StdRng::seed_from_u64(4);
        let out = rain(&img, &RainParams::default(), &mut rng);
        assert_eq!(out.dimensions(), img.dimensions());
        assert_ne!(out, img);
    }
}
