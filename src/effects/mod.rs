//! Weather renderers: pure functions from an RGB buffer to a new RGB buffer.
//!
//! | Effect | Recipe |
//! |---|---|
//! | **Rain** | slanted streaks (`imageproc` lines) → box blur → HLS lightness × coefficient |
//! | **Motion blur** | random line kernel, reflect-101 convolution |
//! | **Snow** | HLS lightness × coefficient below a sampled threshold |
//! | **Fog** | translucent white discs in rings around the centre → box blur |
//! | **Sun glare** | flare circles along a random line + radial source, overlay blending |
//!
//! Every renderer takes its parameter struct and an `Rng`; stochastic choices
//! are sampled into a layout first and drawn second, so drawing is
//! deterministic given the layout and the whole effect is reproducible given
//! a seeded RNG.
//!
//! The [`registry`] composes renderers into one [`WeatherPipeline`] per
//! [`Weather`](crate::weather::Weather).

pub mod blur;
pub mod color;
pub mod fog;
pub mod params;
pub mod rain;
pub mod registry;
pub mod snow;
pub mod sun_flare;

pub use params::{
    FogParams, MotionBlurParams, Probability, RainParams, Range, Roi, SnowParams, SunFlareParams,
};
pub use registry::{Operation, Registry, WeatherPipeline};
