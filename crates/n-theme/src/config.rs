//! Palette configuration: what the caller authors.
//!
//! These types mirror the JSON a palette document is stored as (camelCase
//! keys, upper-case enum values). They are plain data; the builder in
//! [`crate::palette`] reads them and never mutates them.

use std::fmt;

use n_color::{AlgorithmVersion, ColorSpace, Rgb, VisionMode};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Palette name used when none is configured.
pub const DEFAULT_PALETTE_NAME: &str = "UI Color Palette";

/// Compositing background used when a color does not name one.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

fn default_name() -> String {
    DEFAULT_PALETTE_NAME.to_string()
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

const fn default_chroma_shift() -> f64 {
    100.0
}

// ── Palette ──────────────────────────────────────────────────────────────────

/// A complete palette document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub colors: Vec<SourceColor>,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub color_space: ColorSpace,
    #[serde(default)]
    pub algorithm_version: AlgorithmVersion,
    #[serde(default)]
    pub are_source_colors_locked: bool,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: String::new(),
            colors: Vec::new(),
            themes: Vec::new(),
            color_space: ColorSpace::default(),
            algorithm_version: AlgorithmVersion::default(),
            are_source_colors_locked: false,
        }
    }
}

// ── Source colors ────────────────────────────────────────────────────────────

/// An RGB triple with 0.0–1.0 channels, as authored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl UnitRgb {
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// The same color on the 0–255 scale.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        Rgb::from_unit(self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HueSetting {
    /// Degrees.
    pub shift: f64,
    pub is_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChromaSetting {
    /// Percent; 100 keeps the source chroma.
    pub shift: f64,
    pub is_locked: bool,
}

impl Default for ChromaSetting {
    fn default() -> Self {
        Self {
            shift: default_chroma_shift(),
            is_locked: false,
        }
    }
}

/// Opacity mode: when enabled, scale targets are opacities and shades are
/// composited over `background_color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlphaSetting {
    pub is_enabled: bool,
    /// Hex.
    pub background_color: String,
}

impl Default for AlphaSetting {
    fn default() -> Self {
        Self {
            is_enabled: false,
            background_color: default_background(),
        }
    }
}

/// One designer-chosen color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceColor {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rgb: UnitRgb,
    #[serde(default)]
    pub hue: HueSetting,
    #[serde(default)]
    pub chroma: ChromaSetting,
    #[serde(default)]
    pub alpha: AlphaSetting,
}

impl SourceColor {
    /// A color with neutral settings; the id is the name.
    #[must_use]
    pub fn new(name: impl Into<String>, rgb: UnitRgb) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            description: String::new(),
            rgb,
            hue: HueSetting::default(),
            chroma: ChromaSetting::default(),
            alpha: AlphaSetting::default(),
        }
    }

    #[must_use]
    pub const fn with_hue_shift(mut self, degrees: f64) -> Self {
        self.hue.shift = degrees;
        self
    }

    #[must_use]
    pub const fn with_chroma_shift(mut self, percent: f64) -> Self {
        self.chroma.shift = percent;
        self
    }

    /// Switch to opacity mode over `background` (hex).
    #[must_use]
    pub fn with_alpha(mut self, background: impl Into<String>) -> Self {
        self.alpha = AlphaSetting {
            is_enabled: true,
            background_color: background.into(),
        };
        self
    }
}

// ── Themes ───────────────────────────────────────────────────────────────────

/// Whether a theme is the palette's base theme or an extra overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeKind {
    #[default]
    #[serde(rename = "default theme")]
    Default,
    #[serde(rename = "custom theme")]
    Custom,
}

/// A scale plus the viewing conditions it is rendered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scale: Scale,
    #[serde(default)]
    pub vision_simulation_mode: VisionMode,
    #[serde(default = "default_background")]
    pub palette_background: String,
    #[serde(rename = "type", default)]
    pub kind: ThemeKind,
}

impl Theme {
    /// A default theme; the id is the name.
    #[must_use]
    pub fn new(name: impl Into<String>, scale: Scale) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            description: String::new(),
            scale,
            vision_simulation_mode: VisionMode::None,
            palette_background: default_background(),
            kind: ThemeKind::Default,
        }
    }

    #[must_use]
    pub const fn with_vision(mut self, mode: VisionMode) -> Self {
        self.vision_simulation_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: ThemeKind) -> Self {
        self.kind = kind;
        self
    }
}

// ── Scale ────────────────────────────────────────────────────────────────────

/// Named stops mapped to targets (lightness percent, or opacity percent
/// for alpha-enabled colors).
///
/// Stops keep the order they were authored in. In JSON a scale is an object
/// whose key order is significant, so it is read and written entry by
/// entry. A repeated label keeps its first position and its last target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scale(Vec<(String, f64)>);

impl Scale {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a stop, or retarget an existing label in place.
    pub fn insert(&mut self, label: impl Into<String>, target: f64) {
        let label = label.into();
        if let Some(slot) = self.0.iter_mut().find(|(l, _)| *l == label) {
            slot.1 = target;
        } else {
            self.0.push((label, target));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stops in authored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, t)| (l.as_str(), *t))
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, t)| *t)
    }

    /// Stops sorted by target, highest first. Equal targets keep their
    /// authored order.
    #[must_use]
    pub fn descending(&self) -> Vec<(&str, f64)> {
        let mut stops: Vec<_> = self.iter().collect();
        stops.sort_by(|a, b| b.1.total_cmp(&a.1));
        stops
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Scale {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut scale = Self::new();
        for (label, target) in iter {
            scale.insert(label, target);
        }
        scale
    }
}

impl Serialize for Scale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, target) in &self.0 {
            map.serialize_entry(label, target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Scale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScaleVisitor;

        impl<'de> Visitor<'de> for ScaleVisitor {
            type Value = Scale;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of stop labels to numeric targets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Scale, A::Error> {
                let mut scale = Scale(Vec::with_capacity(access.size_hint().unwrap_or(0)));
                while let Some((label, target)) = access.next_entry::<String, f64>()? {
                    scale.insert(label, target);
                }
                Ok(scale)
            }
        }

        deserializer.deserialize_map(ScaleVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOCUMENT: &str = r##"{
        "name": "Brand",
        "colors": [
            { "id": "c1", "name": "Red", "rgb": { "r": 1, "g": 0, "b": 0 },
              "hue": { "shift": 10, "isLocked": false },
              "alpha": { "isEnabled": true, "backgroundColor": "#000000" } }
        ],
        "themes": [
            { "id": "t1", "name": "Light", "type": "default theme",
              "scale": { "lightness-50": 96, "lightness-500": 50, "lightness-950": 10 },
              "visionSimulationMode": "DEUTERANOPIA" }
        ],
        "colorSpace": "OKLCH",
        "algorithmVersion": "v2",
        "areSourceColorsLocked": true
    }"##;

    #[test]
    fn document_parses() {
        let config: PaletteConfig = serde_json::from_str(DOCUMENT).unwrap();
        assert_eq!(config.name, "Brand");
        assert_eq!(config.color_space, ColorSpace::Oklch);
        assert_eq!(config.algorithm_version, AlgorithmVersion::V2);
        assert!(config.are_source_colors_locked);

        let color = &config.colors[0];
        assert_eq!(color.rgb, UnitRgb::new(1.0, 0.0, 0.0));
        assert!((color.hue.shift - 10.0).abs() < f64::EPSILON);
        assert!((color.chroma.shift - 100.0).abs() < f64::EPSILON);
        assert!(color.alpha.is_enabled);

        let theme = &config.themes[0];
        assert_eq!(theme.vision_simulation_mode, VisionMode::Deuteranopia);
        assert_eq!(theme.kind, ThemeKind::Default);
        assert_eq!(theme.palette_background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn defaults_fill_gaps() {
        let config: PaletteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PaletteConfig::default());
        assert_eq!(config.name, DEFAULT_PALETTE_NAME);
        assert_eq!(config.color_space, ColorSpace::Lch);
        assert_eq!(config.algorithm_version, AlgorithmVersion::V3);
    }

    #[test]
    fn unknown_color_space_rejected() {
        let err = serde_json::from_str::<PaletteConfig>(r#"{"colorSpace": "P3"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown color space: \"P3\""), "{err}");
    }

    #[test]
    fn enum_names_ignore_case() {
        let config: PaletteConfig = serde_json::from_str(
            r#"{"colorSpace": "oklch", "algorithmVersion": "V1",
                "themes": [{ "name": "T", "scale": {}, "visionSimulationMode": "tritanopia" }]}"#,
        )
        .unwrap();
        assert_eq!(config.color_space, ColorSpace::Oklch);
        assert_eq!(config.algorithm_version, AlgorithmVersion::V1);
        assert_eq!(config.themes[0].vision_simulation_mode, VisionMode::Tritanopia);
    }

    #[test]
    fn unknown_vision_mode_still_loads() {
        let config: PaletteConfig =
            serde_json::from_str(r#"{"themes": [{ "name": "T", "scale": {}, "visionSimulationMode": "SEPIA" }]}"#)
                .unwrap();
        assert_eq!(config.themes[0].vision_simulation_mode, VisionMode::Unknown);
    }

    #[test]
    fn unknown_algorithm_version_rejected() {
        let err = serde_json::from_str::<PaletteConfig>(r#"{"algorithmVersion": "v9"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown algorithm version"), "{err}");
    }

    // ── Scale ───────────────────────────────────────────────────────

    #[test]
    fn scale_keeps_document_order() {
        let scale: Scale = serde_json::from_str(r#"{"950": 10, "50": 96, "500": 50}"#).unwrap();
        let labels: Vec<_> = scale.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["950", "50", "500"]);
    }

    #[test]
    fn scale_serializes_in_order() {
        let scale: Scale = [("b", 2.0), ("a", 1.0)].into_iter().collect();
        assert_eq!(serde_json::to_string(&scale).unwrap(), r#"{"b":2.0,"a":1.0}"#);
    }

    #[test]
    fn scale_descending_is_stable() {
        let scale: Scale = [("x", 50.0), ("hi", 90.0), ("y", 50.0), ("lo", 10.0)]
            .into_iter()
            .collect();
        assert_eq!(
            scale.descending(),
            vec![("hi", 90.0), ("x", 50.0), ("y", 50.0), ("lo", 10.0)]
        );
        // Authored order is untouched.
        assert_eq!(scale.iter().next(), Some(("x", 50.0)));
    }

    #[test]
    fn scale_repeated_label_retargets() {
        let mut scale = Scale::new();
        scale.insert("a", 1.0);
        scale.insert("b", 2.0);
        scale.insert("a", 3.0);
        assert_eq!(scale.len(), 2);
        assert_eq!(scale.get("a"), Some(3.0));
        assert_eq!(scale.iter().next(), Some(("a", 3.0)));
    }
}
