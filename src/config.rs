//! Generator configuration.
//!
//! One [`GeneratorConfig`] is built at startup and passed by reference to the
//! batch processor and the preview. It comes from three layers, later layers
//! overriding earlier ones:
//!
//! 1. stock defaults ([`GeneratorConfig::default`])
//! 2. an optional `weather-gen.toml` (or the file given with `--config`)
//! 3. command-line flags (`--input`, `--output`, `--seed`, `--no-preview`)
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_dir = "input-test"
//! output_dir = "output"
//! # seed = 42               # fixed seed for reproducible effects
//!
//! [output]
//! jpeg_quality = 95
//!
//! [preview]
//! enabled = true
//! max_images = 4
//! tile_height = 240
//! open_viewer = true
//!
//! [effects.rainy.rain]
//! brightness_coefficient = 0.9
//! drop_width = 1
//! blur_value = 3
//!
//! [effects.rainy.motion_blur]
//! blur_limit = 3
//! probability = 0.2
//!
//! [effects.snowy]
//! brightness_coeff = 2.5
//! snow_point = [0.1, 0.3]
//!
//! [effects.foggy]
//! fog_coef = [0.3, 0.5]
//! alpha_coef = 0.08
//!
//! [effects.sunny_glare]
//! flare_roi = [0.0, 0.0, 1.0, 0.5]
//! src_radius = 400
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::effects::{FogParams, MotionBlurParams, RainParams, SnowParams, SunFlareParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "weather-gen.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything the generator needs to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Folder whose images are augmented (non-recursive).
    pub input_dir: PathBuf,
    /// Folder that receives `{stem}_{weather}{ext}` artifacts.
    pub output_dir: PathBuf,
    /// Seed for every random choice the effects make. Absent = OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Encoding settings for written artifacts.
    pub output: OutputConfig,
    /// Contact-sheet preview settings.
    pub preview: PreviewConfig,
    /// Parameter table for every weather pipeline.
    pub effects: EffectsConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input-test"),
            output_dir: PathBuf::from("output"),
            seed: None,
            output: OutputConfig::default(),
            preview: PreviewConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create the output directory (and parents) if it does not exist.
    pub fn ensure_output_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.output_dir)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.jpeg_quality == 0 || self.output.jpeg_quality > 100 {
            return Err(invalid("output.jpeg_quality must be 1-100"));
        }
        if self.preview.max_images == 0 {
            return Err(invalid("preview.max_images must be at least 1"));
        }
        if self.preview.tile_height == 0 {
            return Err(invalid("preview.tile_height must be non-zero"));
        }
        self.effects.validate()
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.to_string())
}

/// Encoding settings for artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { jpeg_quality: 95 }
    }
}

/// Contact-sheet preview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Run the preview after processing.
    pub enabled: bool,
    /// Number of artifacts shown side by side.
    pub max_images: usize,
    /// Height (pixels) every tile is scaled to.
    pub tile_height: u32,
    /// Launch the platform image viewer on the rendered sheet.
    pub open_viewer: bool,
    /// Where the sheet is written. Defaults to a file in the system temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_path: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_images: 4,
            tile_height: 240,
            open_viewer: true,
            sheet_path: None,
        }
    }
}

impl PreviewConfig {
    pub fn resolved_sheet_path(&self) -> PathBuf {
        self.sheet_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("weather-gen-preview.png"))
    }
}

/// Parameters for the two steps of the rainy pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RainyConfig {
    pub rain: RainParams,
    pub motion_blur: MotionBlurParams,
}

/// The weather parameter table, one section per weather type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    pub rainy: RainyConfig,
    pub snowy: SnowParams,
    pub foggy: FogParams,
    pub sunny_glare: SunFlareParams,
}

impl EffectsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rain = &self.rainy.rain;
        if !rain.slant.is_ordered() {
            return Err(invalid("effects.rainy.rain.slant must be [lower, upper]"));
        }
        if rain.drop_width == 0 || rain.drop_length == 0 {
            return Err(invalid(
                "effects.rainy.rain.drop_width and drop_length must be non-zero",
            ));
        }
        if !(0.0..=1.0).contains(&rain.brightness_coefficient) {
            return Err(invalid(
                "effects.rainy.rain.brightness_coefficient must be 0.0-1.0",
            ));
        }
        if self.rainy.motion_blur.blur_limit < 3 {
            return Err(invalid("effects.rainy.motion_blur.blur_limit must be >= 3"));
        }

        let snow = &self.snowy;
        if !snow.snow_point.is_ordered()
            || snow.snow_point.lower < 0.0
            || snow.snow_point.upper > 1.0
        {
            return Err(invalid(
                "effects.snowy.snow_point must be an ordered range within 0.0-1.0",
            ));
        }
        if !snow.brightness_coeff.is_finite() || snow.brightness_coeff < 0.0 {
            return Err(invalid(
                "effects.snowy.brightness_coeff must be a finite number >= 0",
            ));
        }

        let fog = &self.foggy;
        if !fog.fog_coef.is_ordered() || fog.fog_coef.lower < 0.0 || fog.fog_coef.upper > 1.0 {
            return Err(invalid(
                "effects.foggy.fog_coef must be an ordered range within 0.0-1.0",
            ));
        }
        if !(0.0..=1.0).contains(&fog.alpha_coef) {
            return Err(invalid("effects.foggy.alpha_coef must be 0.0-1.0"));
        }

        let flare = &self.sunny_glare;
        let roi = flare.flare_roi;
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if ![roi.x_min, roi.y_min, roi.x_max, roi.y_max]
            .into_iter()
            .all(in_unit)
            || roi.x_min > roi.x_max
            || roi.y_min > roi.y_max
        {
            return Err(invalid(
                "effects.sunny_glare.flare_roi must be [x_min, y_min, x_max, y_max] within 0.0-1.0",
            ));
        }
        if !flare.angle.is_finite() || !flare.angle.is_ordered() {
            return Err(invalid(
                "effects.sunny_glare.angle must be [lower, upper] with finite bounds",
            ));
        }
        if !flare.num_flare_circles.is_ordered() {
            return Err(invalid(
                "effects.sunny_glare.num_flare_circles must be [lower, upper]",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(GeneratorConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GeneratorConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GeneratorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults if it is absent.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Load config from a file that must exist (an explicit `--config`).
pub fn load_required_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    resolve_config(Some(toml::from_str(&content)?))
}

/// Returns a fully-commented stock `weather-gen.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# weather-gen configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Folder whose images are augmented (non-recursive, every file is tried).
input_dir = "input-test"

# Folder that receives the {stem}_{weather}{ext} artifacts. Created if absent.
output_dir = "output"

# Fixed seed for reproducible effects. Omit for a fresh random run.
# seed = 42

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# JPEG quality for .jpg/.jpeg artifacts (1 = worst, 100 = best).
jpeg_quality = 95

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Show a contact sheet of a few artifacts after processing.
enabled = true

# How many artifacts go on the sheet.
max_images = 4

# Height every tile is scaled to, in pixels.
tile_height = 240

# Open the sheet in the system image viewer.
open_viewer = true

# Where the sheet is written. Defaults to the system temp directory.
# sheet_path = "/tmp/weather-gen-preview.png"

# ---------------------------------------------------------------------------
# Rainy: streaks, then an occasional motion blur
# ---------------------------------------------------------------------------
[effects.rainy.rain]
# Horizontal offset between the top and bottom of a drop, sampled per image.
slant = [-10, 10]
drop_length = 20
drop_width = 1
drop_color = [200, 200, 200]
# Box blur size applied after drawing the drops.
blur_value = 3
# Lightness multiplier (lower = darker, overcast look).
brightness_coefficient = 0.9
probability = 1.0

[effects.rainy.motion_blur]
# Largest kernel size; odd sizes from 3 up to this are used.
blur_limit = 3
probability = 0.2

# ---------------------------------------------------------------------------
# Snowy
# ---------------------------------------------------------------------------
[effects.snowy]
# Bounds for how much of the image turns white (fraction of lightness).
snow_point = [0.1, 0.3]
# Lightness multiplier for pixels below the snow threshold.
brightness_coeff = 2.5
probability = 1.0

# ---------------------------------------------------------------------------
# Foggy
# ---------------------------------------------------------------------------
[effects.foggy]
# Bounds for fog density.
fog_coef = [0.3, 0.5]
# Transparency of each haze disc, scaled by density.
alpha_coef = 0.08
probability = 1.0

# ---------------------------------------------------------------------------
# Sunny glare
# ---------------------------------------------------------------------------
[effects.sunny_glare]
# Region the sun is placed in: [x_min, y_min, x_max, y_max], normalised.
flare_roi = [0.0, 0.0, 1.0, 0.5]
# Flare axis angle bounds, in turns (1.0 = full circle).
angle = [0.0, 1.0]
num_flare_circles = [6, 10]
# Radius of the glowing source, in pixels.
src_radius = 400
src_color = [255, 255, 255]
probability = 1.0
"##
}
