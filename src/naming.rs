//! Artifact filename derivation.
//!
//! Every output is named `{stem}_{weather}{ext}`, where `stem` and `ext` are
//! split the way shells and most tooling do it:
//!
//! - `beach.jpg` → stem `beach`, ext `.jpg`
//! - `archive.tar.gz` → stem `archive.tar`, ext `.gz`
//! - `.profile` → stem `.profile`, no ext (a leading dot is not an extension)
//! - `README` → stem `README`, no ext
//!
//! The extension keeps its original case so `IMG_01.JPG` becomes
//! `IMG_01_rainy.JPG`.

use crate::weather::Weather;

/// A filename split into stem and extension. `ext` includes the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitName<'a> {
    pub stem: &'a str,
    pub ext: &'a str,
}

/// Split a filename into stem and extension.
pub fn split_extension(filename: &str) -> SplitName<'_> {
    let leading_dots = filename.len() - filename.trim_start_matches('.').len();
    match filename.rfind('.') {
        Some(dot) if dot >= leading_dots => SplitName {
            stem: &filename[..dot],
            ext: &filename[dot..],
        },
        _ => SplitName {
            stem: filename,
            ext: "",
        },
    }
}

/// Derive the artifact filename for one (input, weather) pair.
pub fn artifact_name(filename: &str, weather: Weather) -> String {
    let SplitName { stem, ext } = split_extension(filename);
    format!("{}_{}{}", stem, weather.name(), ext)
}

/// Hidden entries (leading dot) are invisible to directory listings.
pub fn is_hidden(filename: &str) -> bool {
    filename.starts_with('.')
}
