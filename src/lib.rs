//! # Weather Gen
//!
//! Batch-apply synthetic weather to a folder of images. Every readable image
//! in the input folder is written out once per weather type (rainy, snowy,
//! foggy, sunny glare), and a contact sheet of a few results is shown at the
//! end so the effects can be eyeballed.
//!
//! # Architecture: Two Steps
//!
//! ```text
//! 1. Process   input-test/  →  output/{stem}_{weather}{ext}   (decode → effects → encode)
//! 2. Preview   output/      →  contact sheet                  (read-only)
//! ```
//!
//! The steps share nothing but the output directory, so either can run alone
//! (`weather-gen process`, `weather-gen preview`).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`weather`] | The closed set of weather types and their artifact suffixes |
//! | [`effects`] | Pixel renderers (rain, snow, fog, sun glare, blur) and the weather → pipeline registry |
//! | [`process`] | Step 1: walks the input folder, runs every pipeline, writes artifacts |
//! | [`preview`] | Step 2: composes and shows a contact sheet of the first artifacts |
//! | [`config`] | `weather-gen.toml` loading, merging over stock defaults, validation |
//! | [`naming`] | `{stem}_{weather}{ext}` artifact naming |
//! | [`imaging`] | Decode/encode backend and the RGB working layout |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Effects on RGB8, Files in Any Layout
//!
//! Every renderer works on an `RgbImage`. Decoding converts whatever the file
//! holds (grayscale, 16-bit, alpha) into that working buffer, and
//! [`imaging::SourceLayout`] reattaches alpha on the way out. Renderers stay
//! small and never branch on pixel formats.
//!
//! ## Sample, Then Draw
//!
//! Each stochastic renderer first samples a layout (drop positions, haze
//! points, flare circles) from the RNG and then draws it deterministically.
//! With `--seed` a whole run is reproducible byte for byte, and drawing code
//! is tested against hand-written layouts.
//!
//! ## Skip, Don't Stop
//!
//! An unreadable input or an artifact with no encoder is recorded in the
//! [`process::ProcessReport`] and the batch carries on. Only I/O failures on
//! the output side abort the run.

pub mod config;
pub mod effects;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod preview;
pub mod process;
pub mod weather;

#[cfg(test)]
pub(crate) mod test_helpers;
