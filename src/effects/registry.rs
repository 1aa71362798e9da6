//! The effect registry: one pipeline per [`Weather`].
//!
//! A pipeline is an ordered list of [`Operation`]s. Each operation carries its
//! own parameter struct and application probability, and dispatch is a single
//! exhaustive `match`, so a new weather type or step is a compile-checked
//! change rather than a new string key.

use super::params::{
    FogParams, MotionBlurParams, Probability, RainParams, SnowParams, SunFlareParams,
};
use super::{blur, fog, rain, snow, sun_flare};
use crate::config::EffectsConfig;
use crate::weather::Weather;
use image::RgbImage;
use rand::Rng;

/// One configured image operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Rain(RainParams),
    MotionBlur(MotionBlurParams),
    Snow(SnowParams),
    Fog(FogParams),
    SunFlare(SunFlareParams),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Rain(_) => "RandomRain",
            Operation::MotionBlur(_) => "MotionBlur",
            Operation::Snow(_) => "RandomSnow",
            Operation::Fog(_) => "RandomFog",
            Operation::SunFlare(_) => "RandomSunFlare",
        }
    }

    pub fn probability(&self) -> Probability {
        match self {
            Operation::Rain(p) => p.probability,
            Operation::MotionBlur(p) => p.probability,
            Operation::Snow(p) => p.probability,
            Operation::Fog(p) => p.probability,
            Operation::SunFlare(p) => p.probability,
        }
    }

    /// Render this operation unconditionally.
    pub fn render(&self, image: &RgbImage, rng: &mut impl Rng) -> RgbImage {
        match self {
            Operation::Rain(p) => rain::rain(image, p, rng),
            Operation::MotionBlur(p) => blur::motion_blur(image, p, rng),
            Operation::Snow(p) => snow::snow(image, p, rng),
            Operation::Fog(p) => fog::fog(image, p, rng),
            Operation::SunFlare(p) => sun_flare::sun_flare(image, p, rng),
        }
    }

    /// Render with this operation's probability; `None` when the roll skips it.
    pub fn maybe_render(&self, image: &RgbImage, rng: &mut impl Rng) -> Option<RgbImage> {
        let p = self.probability().value();
        if rng.random::<f64>() < p {
            Some(self.render(image, rng))
        } else {
            log::debug!("{} skipped (p = {p})", self.name());
            None
        }
    }
}

/// A named, ordered composition of operations.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherPipeline {
    pub weather: Weather,
    pub steps: Vec<Operation>,
}

impl WeatherPipeline {
    /// Run every step in order. The source buffer is never modified.
    pub fn apply(&self, image: &RgbImage, rng: &mut impl Rng) -> RgbImage {
        let mut current = image.clone();
        for step in &self.steps {
            if let Some(next) = step.maybe_render(&current, rng) {
                current = next;
            }
        }
        current
    }
}

/// Build the pipeline for one weather type.
pub fn pipeline_for(weather: Weather, effects: &EffectsConfig) -> WeatherPipeline {
    let steps = match weather {
        Weather::Rainy => vec![
            Operation::Rain(effects.rainy.rain.clone()),
            Operation::MotionBlur(effects.rainy.motion_blur.clone()),
        ],
        Weather::Snowy => vec![Operation::Snow(effects.snowy.clone())],
        Weather::Foggy => vec![Operation::Fog(effects.foggy.clone())],
        Weather::SunnyGlare => vec![Operation::SunFlare(effects.sunny_glare.clone())],
    };
    WeatherPipeline { weather, steps }
}

/// Fixed mapping from weather type to pipeline, iterated in [`Weather::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    pipelines: Vec<WeatherPipeline>,
}

impl Registry {
    pub fn from_config(effects: &EffectsConfig) -> Self {
        Self {
            pipelines: Weather::ALL
                .into_iter()
                .map(|w| pipeline_for(w, effects))
                .collect(),
        }
    }

    pub fn pipelines(&self) -> &[WeatherPipeline] {
        &self.pipelines
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::from_config(&EffectsConfig::default())
    }
}
