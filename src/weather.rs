//! The closed set of weather types the generator can synthesise.
//!
//! Each variant has a stable snake_case name that appears in artifact
//! filenames (`beach_sunny_glare.jpg`) and in the config file
//! (`[effects.sunny_glare]`).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Rainy,
    Snowy,
    Foggy,
    SunnyGlare,
}

impl Weather {
    /// Every weather type, in registry order.
    pub const ALL: [Weather; 4] = [
        Weather::Rainy,
        Weather::Snowy,
        Weather::Foggy,
        Weather::SunnyGlare,
    ];

    /// Name used as the artifact filename suffix.
    pub fn name(self) -> &'static str {
        match self {
            Weather::Rainy => "rainy",
            Weather::Snowy => "snowy",
            Weather::Foggy => "foggy",
            Weather::SunnyGlare => "sunny_glare",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
