//! Hue harmony generation: fixed-offset rotations around the HSL wheel.
//!
//! Each harmony takes a base color and returns it followed by hue-rotated
//! siblings. Saturation and lightness of the base are kept; only the hue
//! moves. The first color in every result is the base itself.

use std::fmt;
use std::str::FromStr;

use n_color::space::{hsl_to_rgb, normalize_hue};
use n_color::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default spread of the analogous harmony, in degrees.
pub const DEFAULT_SPREAD: f64 = 30.0;

/// Default short side of the tetradic rectangle, in degrees.
pub const DEFAULT_TETRADIC_ANGLE: f64 = 90.0;

/// The kind of harmony to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmonyKind {
    /// Base and its two neighbours at ± spread.
    Analogous,
    /// Base and its opposite (+180).
    Complementary,
    /// 120-degree spacing (3 colors).
    Triadic,
    /// Rectangle: two complementary pairs `angle` apart (4 colors).
    Tetradic,
    /// 90-degree spacing (4 colors).
    Square,
}

impl HarmonyKind {
    /// Wire name of this harmony.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Analogous => "ANALOGOUS",
            Self::Complementary => "COMPLEMENTARY",
            Self::Triadic => "TRIADIC",
            Self::Tetradic => "TETRADIC",
            Self::Square => "SQUARE",
        }
    }

    /// All harmony kinds, in the order [`ColorHarmony::all_harmonies`] uses.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Analogous,
            Self::Complementary,
            Self::Triadic,
            Self::Tetradic,
            Self::Square,
        ]
    }

    /// Hue offsets in degrees, base first.
    #[must_use]
    pub fn offsets(self, spread: f64, tetradic_angle: f64) -> Vec<f64> {
        match self {
            Self::Analogous => vec![0.0, -spread, spread],
            Self::Complementary => vec![0.0, 180.0],
            Self::Triadic => vec![0.0, 120.0, 240.0],
            Self::Tetradic => vec![0.0, tetradic_angle, 180.0, 180.0 + tetradic_angle],
            Self::Square => vec![0.0, 90.0, 180.0, 270.0],
        }
    }
}

impl fmt::Display for HarmonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HarmonyKind {
    type Err = Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::UnknownHarmony(s.to_string()))
    }
}

/// One generated harmony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonyResult {
    #[serde(rename = "type")]
    pub kind: HarmonyKind,
    pub base_color: [u8; 3],
    pub base_hex: String,
    /// Base first, then the rotated siblings.
    pub colors: Vec<[u8; 3]>,
    pub hex_colors: Vec<String>,
}

/// Harmony generator around one base color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorHarmony {
    base: Rgb,
    spread: f64,
    tetradic_angle: f64,
}

impl ColorHarmony {
    /// `base` is on the 0–255 scale.
    #[must_use]
    pub const fn new(base: Rgb) -> Self {
        Self {
            base,
            spread: DEFAULT_SPREAD,
            tetradic_angle: DEFAULT_TETRADIC_ANGLE,
        }
    }

    /// Analogous spread in degrees, clamped to [1, 180].
    #[must_use]
    pub const fn with_spread(mut self, degrees: f64) -> Self {
        self.spread = degrees.clamp(1.0, 180.0);
        self
    }

    /// Tetradic rectangle angle in degrees, clamped to [1, 179].
    #[must_use]
    pub const fn with_tetradic_angle(mut self, degrees: f64) -> Self {
        self.tetradic_angle = degrees.clamp(1.0, 179.0);
        self
    }

    #[must_use]
    pub const fn spread(&self) -> f64 {
        self.spread
    }

    #[must_use]
    pub const fn tetradic_angle(&self) -> f64 {
        self.tetradic_angle
    }

    /// Generate one harmony.
    #[must_use]
    pub fn generate(&self, kind: HarmonyKind) -> HarmonyResult {
        let [hue, s, l] = self.base.to_hsl();
        let hue = if hue.is_nan() { 0.0 } else { hue };

        let colors: Vec<[u8; 3]> = kind
            .offsets(self.spread, self.tetradic_angle)
            .into_iter()
            .map(|offset| {
                if offset == 0.0 {
                    self.base.to_rgb8()
                } else {
                    hsl_to_rgb([normalize_hue(hue + offset), s, l]).to_rgb8()
                }
            })
            .collect();

        HarmonyResult {
            kind,
            base_color: self.base.to_rgb8(),
            base_hex: self.base.to_hex(),
            hex_colors: colors.iter().map(|c| Rgb::from_rgb8(*c).to_hex()).collect(),
            colors,
        }
    }

    /// Generate a harmony by name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownHarmony`] when `name` is not a harmony.
    pub fn generate_by_name(&self, name: &str) -> Result<HarmonyResult, Error> {
        Ok(self.generate(name.parse()?))
    }

    #[must_use]
    pub fn analogous(&self) -> HarmonyResult {
        self.generate(HarmonyKind::Analogous)
    }

    #[must_use]
    pub fn complementary(&self) -> HarmonyResult {
        self.generate(HarmonyKind::Complementary)
    }

    #[must_use]
    pub fn triadic(&self) -> HarmonyResult {
        self.generate(HarmonyKind::Triadic)
    }

    #[must_use]
    pub fn tetradic(&self) -> HarmonyResult {
        self.generate(HarmonyKind::Tetradic)
    }

    #[must_use]
    pub fn square(&self) -> HarmonyResult {
        self.generate(HarmonyKind::Square)
    }

    /// Every harmony, in [`HarmonyKind::all`] order.
    #[must_use]
    pub fn all_harmonies(&self) -> Vec<HarmonyResult> {
        HarmonyKind::all()
            .iter()
            .map(|kind| self.generate(*kind))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
