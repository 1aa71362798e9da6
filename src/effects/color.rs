//! RGB ↔ HLS conversion and lightness adjustments.
//!
//! Rain and snow both work on the HLS lightness channel: rain scales it down,
//! snow pushes dark pixels up. Components are `f32` in `0.0..=1.0`.

use image::{Rgb, RgbImage};

/// Hue, lightness, saturation; all in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hls {
    pub h: f32,
    pub l: f32,
    pub s: f32,
}

pub fn rgb_to_hls(r: f32, g: f32, b: f32) -> Hls {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hls { h: 0.0, l, s: 0.0 };
    }
    let delta = max - min;
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    Hls {
        h: (h / 6.0).rem_euclid(1.0),
        l,
        s,
    }
}

pub fn hls_to_rgb(hls: Hls) -> (f32, f32, f32) {
    let Hls { h, l, s } = hls;
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f32, m2: f32, hue: f32) -> f32 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// Rewrite every pixel's lightness through `f` (input and output in `0.0..=1.0`).
pub fn map_lightness(image: &RgbImage, f: impl Fn(f32) -> f32) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b] = pixel.0.map(|c| c as f32 / 255.0);
        let mut hls = rgb_to_hls(r, g, b);
        hls.l = f(hls.l).clamp(0.0, 1.0);
        let (r, g, b) = hls_to_rgb(hls);
        *pixel = Rgb([to_u8(r), to_u8(g), to_u8(b)]);
    }
    out
}

#[inline]
pub(crate) fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(rgb: [u8; 3]) -> [u8; 3] {
        let [r, g, b] = rgb.map(|c| c as f32 / 255.0);
        let (r, g, b) = hls_to_rgb(rgb_to_hls(r, g, b));
        [to_u8(r), to_u8(g), to_u8(b)]
    }

    #[test]
    fn round_trip_preserves_colors() {
        for rgb in [
            [0, 0, 0],
            [255, 255, 255],
            [255, 0, 0],
            [0, 255, 0],
            [0, 0, 255],
            [12, 200, 99],
            [240, 128, 7],
            [77, 77, 80],
        ] {
            assert_eq!(round_trip(rgb), rgb, "round trip changed {rgb:?}");
        }
    }

    #[test]
    fn primary_red_hls() {
        let hls = rgb_to_hls(1.0, 0.0, 0.0);
        assert_eq!(hls.h, 0.0);
        assert_eq!(hls.l, 0.5);
        assert_eq!(hls.s, 1.0);
    }

    #[test]
    fn gray_has_no_saturation() {
        let hls = rgb_to_hls(0.4, 0.4, 0.4);
        assert_eq!(hls.s, 0.0);
        assert!((hls.l - 0.4).abs() < 1e-6);
    }

    #[test]
    fn map_lightness_identity() {
        let img = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 90]));
        assert_eq!(map_lightness(&img, |l| l), img);
    }

    #[test]
    fn map_lightness_clamps() {
        let img = RgbImage::from_pixel(2, 2, Rgb([200, 200, 200]));
        let out = map_lightness(&img, |l| l * 10.0);
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }
}
