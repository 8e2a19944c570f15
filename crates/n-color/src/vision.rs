// SPDX-License-Identifier: MIT
//
// Color-vision-deficiency simulation.
//
// Each mode is a 3×3 matrix applied to the (gamma-encoded) RGB channels.
// The result is rounded to integer channels, which is how simulated colors
// are displayed and compared everywhere else.
//
// Mode names that are not recognized still load, as `Unknown`, and render
// every color black.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::rgb::Rgb;

/// A vision simulation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisionMode {
    /// Normal vision: clip and round only.
    #[default]
    None,
    Protanopia,
    Protanomaly,
    Deuteranopia,
    Deuteranomaly,
    Tritanopia,
    Tritanomaly,
    Achromatopsia,
    Achromatomaly,
    /// A mode name that was not recognized. Renders black.
    Unknown,
}

type Matrix = [[f64; 3]; 3];

const PROTANOPIA: Matrix = [[0.567, 0.433, 0.0], [0.558, 0.442, 0.0], [0.0, 0.242, 0.758]];
const PROTANOMALY: Matrix = [[0.817, 0.183, 0.0], [0.333, 0.667, 0.0], [0.0, 0.125, 0.875]];
const DEUTERANOPIA: Matrix = [[0.625, 0.375, 0.0], [0.7, 0.3, 0.0], [0.0, 0.3, 0.7]];
const DEUTERANOMALY: Matrix = [[0.8, 0.2, 0.0], [0.258, 0.742, 0.0], [0.0, 0.142, 0.858]];
const TRITANOPIA: Matrix = [[0.95, 0.05, 0.0], [0.0, 0.433, 0.567], [0.0, 0.475, 0.525]];
const TRITANOMALY: Matrix = [[0.967, 0.033, 0.0], [0.0, 0.733, 0.267], [0.0, 0.183, 0.817]];
const ACHROMATOPSIA: Matrix = [[0.299, 0.587, 0.114], [0.299, 0.587, 0.114], [0.299, 0.587, 0.114]];
const ACHROMATOMALY: Matrix = [[0.618, 0.32, 0.062], [0.163, 0.775, 0.062], [0.163, 0.32, 0.516]];
const BLACKOUT: Matrix = [[0.0; 3]; 3];

impl VisionMode {
    /// Every named mode, normal vision first. `Unknown` is not listed.
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::Protanopia,
        Self::Protanomaly,
        Self::Deuteranopia,
        Self::Deuteranomaly,
        Self::Tritanopia,
        Self::Tritanomaly,
        Self::Achromatopsia,
        Self::Achromatomaly,
    ];

    /// Wire name (`"NONE"`, `"PROTANOPIA"`, …).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Protanopia => "PROTANOPIA",
            Self::Protanomaly => "PROTANOMALY",
            Self::Deuteranopia => "DEUTERANOPIA",
            Self::Deuteranomaly => "DEUTERANOMALY",
            Self::Tritanopia => "TRITANOPIA",
            Self::Tritanomaly => "TRITANOMALY",
            Self::Achromatopsia => "ACHROMATOPSIA",
            Self::Achromatomaly => "ACHROMATOMALY",
            Self::Unknown => "UNKNOWN",
        }
    }

    const fn matrix(self) -> Option<&'static Matrix> {
        match self {
            Self::None => None,
            Self::Protanopia => Some(&PROTANOPIA),
            Self::Protanomaly => Some(&PROTANOMALY),
            Self::Deuteranopia => Some(&DEUTERANOPIA),
            Self::Deuteranomaly => Some(&DEUTERANOMALY),
            Self::Tritanopia => Some(&TRITANOPIA),
            Self::Tritanomaly => Some(&TRITANOMALY),
            Self::Achromatopsia => Some(&ACHROMATOPSIA),
            Self::Achromatomaly => Some(&ACHROMATOMALY),
            Self::Unknown => Some(&BLACKOUT),
        }
    }

    /// Look up a mode by name, case-insensitively. An unrecognized name is
    /// logged and becomes [`VisionMode::Unknown`].
    #[must_use]
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: Error| {
            warn!(%err, "falling back to black");
            Self::Unknown
        })
    }

    /// Simulate how `rgb` is perceived under this mode.
    ///
    /// The output is clamped to 0–255 and rounded per channel.
    #[must_use]
    pub fn simulate(self, rgb: Rgb) -> Rgb {
        let Some(m) = self.matrix() else {
            return rgb.clamped().rounded();
        };
        let [r, g, b] = rgb.to_array();
        let apply = |row: [f64; 3]| row[2].mul_add(b, row[0].mul_add(r, row[1] * g));
        Rgb::new(apply(m[0]), apply(m[1]), apply(m[2]))
            .clamped()
            .rounded()
    }
}

impl fmt::Display for VisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownVisionMode(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for VisionMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name_lossy(&name))
    }
}

/// Simulate by mode name. An unrecognized name yields black.
#[must_use]
pub fn simulate_by_name(name: &str, rgb: Rgb) -> Rgb {
    VisionMode::from_name_lossy(name).simulate(rgb)
}
