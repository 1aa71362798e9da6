//! Parameter types for the weather renderers.
//!
//! These structs describe *what* each effect should look like, not how it is
//! drawn. They double as the `[effects.*]` tables of the config file, so every
//! struct is `#[serde(default, deny_unknown_fields)]` and its `Default` is the
//! stock parameter set.
//!
//! ## Types
//!
//! - [`Probability`]: chance that a step runs (0.0–1.0). Clamped on construction.
//! - [`RainParams`] / [`MotionBlurParams`]: the two steps of the rainy pipeline.
//! - [`SnowParams`], [`FogParams`], [`SunFlareParams`]: single-step pipelines.
//! - [`Range`]: an inclusive `[lower, upper]` pair sampled uniformly.

use serde::{Deserialize, Serialize};

/// Chance that a pipeline step is applied (0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    pub const ALWAYS: Probability = Probability(1.0);
    pub const NEVER: Probability = Probability(0.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::NEVER;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::ALWAYS
    }
}

impl From<f64> for Probability {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

/// Inclusive range sampled uniformly, written as `[lower, upper]` in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[T; 2]", into = "[T; 2]")]
pub struct Range<T: Copy> {
    pub lower: T,
    pub upper: T,
}

impl<T: Copy> Range<T> {
    pub const fn new(lower: T, upper: T) -> Self {
        Self { lower, upper }
    }
}

impl<T: Copy + PartialOrd> Range<T> {
    pub fn is_ordered(&self) -> bool {
        self.lower <= self.upper
    }
}

impl Range<f32> {
    /// Both bounds are real numbers (no NaN, no infinity).
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}

impl<T: Copy> From<[T; 2]> for Range<T> {
    fn from([lower, upper]: [T; 2]) -> Self {
        Self { lower, upper }
    }
}

impl<T: Copy> From<Range<T>> for [T; 2] {
    fn from(r: Range<T>) -> Self {
        [r.lower, r.upper]
    }
}

/// Rain streaks: slanted lines, a box blur, then a lightness cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RainParams {
    /// Horizontal offset (pixels) between the top and bottom of a drop.
    pub slant: Range<i32>,
    pub drop_length: u32,
    pub drop_width: u32,
    pub drop_color: [u8; 3],
    /// Box blur kernel size applied after drawing the drops.
    pub blur_value: u32,
    /// Multiplier for HLS lightness (< 1.0 darkens).
    pub brightness_coefficient: f32,
    pub probability: Probability,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            slant: Range::new(-10, 10),
            drop_length: 20,
            drop_width: 1,
            drop_color: [200, 200, 200],
            blur_value: 3,
            brightness_coefficient: 0.9,
            probability: Probability::ALWAYS,
        }
    }
}

/// Directional blur with a random line kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionBlurParams {
    /// Largest kernel size; odd sizes from 3 up to this are sampled.
    pub blur_limit: u32,
    pub probability: Probability,
}

impl Default for MotionBlurParams {
    fn default() -> Self {
        Self {
            blur_limit: 3,
            probability: Probability::new(0.2),
        }
    }
}

/// Snow: boosts the lightness of everything darker than a sampled threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnowParams {
    /// Bounds for the snow point, as a fraction of full lightness.
    pub snow_point: Range<f32>,
    /// Lightness multiplier for pixels below the threshold.
    pub brightness_coeff: f32,
    pub probability: Probability,
}

impl Default for SnowParams {
    fn default() -> Self {
        Self {
            snow_point: Range::new(0.1, 0.3),
            brightness_coeff: 2.5,
            probability: Probability::ALWAYS,
        }
    }
}

/// Fog: translucent white discs composited over the image, then softened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FogParams {
    /// Bounds for fog density.
    pub fog_coef: Range<f32>,
    /// Per-disc transparency, scaled by the sampled density.
    pub alpha_coef: f32,
    pub probability: Probability,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            fog_coef: Range::new(0.3, 0.5),
            alpha_coef: 0.08,
            probability: Probability::ALWAYS,
        }
    }
}

/// Normalised rectangle `[x_min, y_min, x_max, y_max]` inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Roi {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl From<[f32; 4]> for Roi {
    fn from([x_min, y_min, x_max, y_max]: [f32; 4]) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

impl From<Roi> for [f32; 4] {
    fn from(r: Roi) -> Self {
        [r.x_min, r.y_min, r.x_max, r.y_max]
    }
}

/// Sun glare: a bright radial source plus flare circles along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SunFlareParams {
    /// Region the flare centre is sampled from.
    pub flare_roi: Roi,
    /// Flare axis angle bounds, in turns (1.0 = full circle).
    pub angle: Range<f32>,
    pub num_flare_circles: Range<u32>,
    /// Radius (pixels) of the glowing source.
    pub src_radius: u32,
    pub src_color: [u8; 3],
    pub probability: Probability,
}

impl Default for SunFlareParams {
    fn default() -> Self {
        Self {
            flare_roi: Roi::from([0.0, 0.0, 1.0, 0.5]),
            angle: Range::new(0.0, 1.0),
            num_flare_circles: Range::new(6, 10),
            src_radius: 400,
            src_color: [255, 255, 255],
            probability: Probability::ALWAYS,
        }
    }
}
