// SPDX-License-Identifier: MIT
//
// Shade generation for a single source color.
//
// A `ColorTransform` holds one source color plus the knobs a palette stop
// applies to it (target lightness, opacity, hue shift, chroma percentage,
// chroma curve, vision simulation). Each target space has a method that
// re-expresses the source with those knobs applied, and an alpha variant
// that keeps the source lightness and attaches the opacity instead.
//
// Everything here is total: out-of-gamut sources, lightness beyond 100 or
// negative chroma shifts all produce a color, never an error. NaN that
// arises in degenerate cases is flushed to 0 before the inverse
// conversion.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::rgb::{Rgb, Rgba};
use crate::space::{
    ColorSpace, hsl_to_rgb, hsluv_to_rgb, lab_to_rgb, lch_to_rgb, normalize_hue, oklab_to_rgb,
    oklch_to_rgb, rotate_ab,
};
use crate::vision::VisionMode;

// ─── AlgorithmVersion ────────────────────────────────────────────────────────

/// Chroma damping curve applied as lightness moves away from midtone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AlgorithmVersion {
    /// No damping.
    #[serde(rename = "v1")]
    V1,
    /// `sin(Lπ)`: zero chroma at black and white, full at L = 50.
    #[serde(rename = "v2")]
    V2,
    /// `√(½·sin(Lπ) + ½·tanh(Lπ))`: a softer roll-off toward the extremes.
    #[default]
    #[serde(rename = "v3")]
    V3,
}

impl AlgorithmVersion {
    pub const ALL: [Self; 3] = [Self::V1, Self::V2, Self::V3];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }

    /// Multiplier applied to chroma at `lightness` (0–100).
    #[must_use]
    pub fn chroma_factor(self, lightness: f64) -> f64 {
        let x = lightness / 100.0 * PI;
        match self {
            Self::V1 => 1.0,
            Self::V2 => x.sin(),
            Self::V3 => x.sin().mul_add(0.5, x.tanh() * 0.5).sqrt(),
        }
    }
}

impl fmt::Display for AlgorithmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownAlgorithmVersion(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for AlgorithmVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

// ─── ColorTransform ──────────────────────────────────────────────────────────

/// One source color and the adjustments a palette stop applies to it.
///
/// # Examples
///
/// ```
/// use n_color::{ColorSpace, ColorTransform, Rgb};
///
/// let red = Rgb::new(255.0, 0.0, 0.0);
/// let light = ColorTransform::new(red).with_lightness(90.0).convert(ColorSpace::Lch);
/// assert!(light.luminance() > red.luminance());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    source: Rgb,
    lightness: f64,
    alpha: f64,
    hue_shift: f64,
    chroma_shift: f64,
    version: AlgorithmVersion,
    vision: VisionMode,
}

impl ColorTransform {
    /// Start from `source` (0–255 channels) with neutral adjustments.
    ///
    /// The target lightness defaults to the source's relative luminance
    /// × 100, rounded to one decimal.
    #[must_use]
    pub fn new(source: Rgb) -> Self {
        if !source.is_in_gamut() {
            warn!(r = source.r, g = source.g, b = source.b, "source color is out of gamut");
        }
        Self {
            source,
            lightness: (source.luminance() * 1000.0).round() / 10.0,
            alpha: 1.0,
            hue_shift: 0.0,
            chroma_shift: 100.0,
            version: AlgorithmVersion::default(),
            vision: VisionMode::None,
        }
    }

    /// Target lightness on a 0–100 scale.
    #[must_use]
    pub const fn with_lightness(mut self, lightness: f64) -> Self {
        self.lightness = lightness;
        self
    }

    /// Opacity (0–1) attached by the alpha variants.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Hue rotation in degrees.
    #[must_use]
    pub const fn with_hue_shift(mut self, degrees: f64) -> Self {
        self.hue_shift = degrees;
        self
    }

    /// Chroma (or saturation) scale in percent; 100 keeps the source chroma.
    #[must_use]
    pub const fn with_chroma_shift(mut self, percent: f64) -> Self {
        self.chroma_shift = percent;
        self
    }

    #[must_use]
    pub const fn with_algorithm(mut self, version: AlgorithmVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub const fn with_vision(mut self, mode: VisionMode) -> Self {
        self.vision = mode;
        self
    }

    #[must_use]
    pub const fn lightness(&self) -> f64 {
        self.lightness
    }

    // ── Adjustments ──────────────────────────────────────────────────────

    /// Rotate `hue` by the configured shift, wrapped into [0, 360).
    #[must_use]
    pub fn adjust_hue(&self, hue: f64) -> f64 {
        normalize_hue(hue + self.hue_shift)
    }

    /// Damp `chroma` by the configured curve at the target lightness.
    #[must_use]
    pub fn adjust_chroma(&self, chroma: f64) -> f64 {
        self.version.chroma_factor(self.lightness) * chroma
    }

    #[inline]
    fn chroma_scale(&self) -> f64 {
        self.chroma_shift / 100.0
    }

    // ── Conversions ──────────────────────────────────────────────────────

    /// The source re-expressed in `space` at the target lightness, after
    /// vision simulation.
    #[must_use]
    pub fn convert(&self, space: ColorSpace) -> Rgb {
        self.simulate(self.shifted(space, Some(self.lightness)))
    }

    /// The source re-expressed in `space` at its own lightness, after
    /// vision simulation, carrying the configured opacity.
    #[must_use]
    pub fn convert_with_alpha(&self, space: ColorSpace) -> Rgba {
        self.simulate(self.shifted(space, None))
            .with_alpha(self.alpha)
    }

    #[must_use]
    pub fn lch(&self) -> Rgb {
        self.convert(ColorSpace::Lch)
    }

    #[must_use]
    pub fn lcha(&self) -> Rgba {
        self.convert_with_alpha(ColorSpace::Lch)
    }

    #[must_use]
    pub fn oklch(&self) -> Rgb {
        self.convert(ColorSpace::Oklch)
    }

    #[must_use]
    pub fn oklcha(&self) -> Rgba {
        self.convert_with_alpha(ColorSpace::Oklch)
    }

    #[must_use]
    pub fn lab(&self) -> Rgb {
        self.convert(ColorSpace::Lab)
    }

    #[must_use]
    pub fn laba(&self) -> Rgba {
        self.convert_with_alpha(ColorSpace::Lab)
    }

    #[must_use]
    pub fn oklab(&self) -> Rgb {
        self.convert(ColorSpace::Oklab)
    }

    #[must_use]
    pub fn oklaba(&self) -> Rgba {
        self.convert_with_alpha(ColorSpace::Oklab)
    }

    #[must_use]
    pub fn hsl(&self) -> Rgb {
        self.convert(ColorSpace::Hsl)
    }

    #[must_use]
    pub fn hsla(&self) -> Rgba {
        self.convert_with_alpha(ColorSpace::Hsl)
    }

    #[must_use]
    pub fn hsluv(&self) -> Rgb {
        self.convert(ColorSpace::Hsluv)
    }

    #[must_use]
    pub fn hsluva(&self) -> Rgba {
        self.convert_with_alpha(ColorSpace::Hsluv)
    }

    /// Apply hue and chroma adjustments in `space`. `lightness` (0–100)
    /// replaces the source lightness when given. The result is clamped and
    /// rounded, ready for simulation.
    fn shifted(&self, space: ColorSpace, lightness: Option<f64>) -> Rgb {
        let scale = self.chroma_scale();
        let rgb = match space {
            ColorSpace::Lch => {
                let [l, c, h] = self.source.to_lch();
                lch_to_rgb([
                    lightness.unwrap_or(l),
                    self.adjust_chroma(c * scale),
                    self.adjust_hue(h),
                ])
            }
            ColorSpace::Oklch => {
                let [l, c, h] = self.source.to_oklch();
                oklch_to_rgb([
                    lightness.map_or(l, |l| l / 100.0),
                    self.adjust_chroma(c * scale),
                    self.adjust_hue(h),
                ])
            }
            ColorSpace::Lab => {
                let [l, a, b] = self.source.to_lab();
                let (a, b) = rotate_ab(a, b, self.hue_shift, scale);
                lab_to_rgb([
                    lightness.unwrap_or(l),
                    self.adjust_chroma(a),
                    self.adjust_chroma(b),
                ])
            }
            ColorSpace::Oklab => {
                let [l, a, b] = self.source.to_oklab();
                let (a, b) = rotate_ab(a, b, self.hue_shift, scale);
                oklab_to_rgb([
                    lightness.map_or(l, |l| l / 100.0),
                    self.adjust_chroma(a),
                    self.adjust_chroma(b),
                ])
            }
            ColorSpace::Hsl => {
                let [h, s, l] = self.source.to_hsl();
                hsl_to_rgb([
                    self.adjust_hue(h),
                    self.adjust_chroma(s * scale),
                    lightness.map_or(l, |l| l / 100.0),
                ])
            }
            ColorSpace::Hsluv => {
                let [h, s, l] = self.source.to_hsluv();
                let h = self.adjust_hue(h);
                let s = self.adjust_chroma(s * scale);
                hsluv_to_rgb([
                    if h.is_nan() { 0.0 } else { h },
                    if s.is_nan() { 0.0 } else { s },
                    lightness.unwrap_or(l),
                ])
            }
        };
        rgb.rounded()
    }

    // ── Source passthrough ───────────────────────────────────────────────

    /// The unmodified source after vision simulation.
    #[must_use]
    pub fn source(&self) -> Rgb {
        self.simulate(self.source)
    }

    /// The unmodified source after vision simulation, with opacity.
    #[must_use]
    pub fn source_with_alpha(&self) -> Rgba {
        self.source().with_alpha(self.alpha)
    }

    /// `[H, S, L]` of the source in HSLuv.
    #[must_use]
    pub fn source_hsluv(&self) -> [f64; 3] {
        self.source.to_hsluv()
    }

    // ── Simulation and compositing ───────────────────────────────────────

    /// `rgb` as seen under the configured vision mode (clamped, rounded).
    #[must_use]
    pub fn simulate(&self, rgb: Rgb) -> Rgb {
        self.vision.simulate(rgb)
    }

    /// Hex of [`simulate`](Self::simulate).
    #[must_use]
    pub fn simulate_hex(&self, rgb: Rgb) -> String {
        self.simulate(rgb).to_hex()
    }

    /// Composite `a` over `b`.
    ///
    /// A fully opaque `a` is returned as is, a fully transparent one yields
    /// `b`. Anything in between is blended, rounded, clamped and then
    /// passed through vision simulation.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn mix_colors_rgb(&self, a: Rgba, b: Rgba) -> Rgb {
        let (a1, a2) = (a.alpha, b.alpha);
        if a1 == 1.0 {
            return a.rgb;
        }
        if a1 == 0.0 {
            return b.rgb;
        }

        let alpha = a2.mul_add(1.0 - a1, a1);
        let blend = |c1: f64, c2: f64| {
            ((c2 * a2).mul_add(1.0 - a1, c1 * a1) / alpha)
                .round()
                .clamp(0.0, 255.0)
        };

        self.simulate(Rgb::new(
            blend(a.rgb.r, b.rgb.r),
            blend(a.rgb.g, b.rgb.g),
            blend(a.rgb.b, b.rgb.b),
        ))
    }

    /// Hex form of [`mix_colors_rgb`](Self::mix_colors_rgb).
    ///
    /// An unparsable `a` is returned unchanged; otherwise an unparsable `b`
    /// is returned unchanged.
    #[must_use]
    pub fn mix_colors_hex(&self, a: &str, b: &str) -> String {
        let Ok(ca) = Rgba::from_hex(a) else {
            return a.to_string();
        };
        let Ok(cb) = Rgba::from_hex(b) else {
            return b.to_string();
        };
        self.mix_colors_rgb(ca, cb).to_hex()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const RED: Rgb = Rgb::new(255.0, 0.0, 0.0);

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn assert_rgb_close(a: Rgb, b: Rgb, eps: f64) {
        assert!(
            approx_eq(a.r, b.r, eps) && approx_eq(a.g, b.g, eps) && approx_eq(a.b, b.b, eps),
            "{a:?} != {b:?}"
        );
    }

    // ── Defaults ─────────────────────────────────────────────────────────

    #[test]
    fn default_lightness_is_luminance_percent() {
        // Red luminance is 0.2126.
        assert!(approx_eq(ColorTransform::new(RED).lightness(), 21.3, 1e-9));
    }

    #[test]
    fn version_parsing() {
        assert_eq!("V2".parse(), Ok(AlgorithmVersion::V2));
        assert!("v4".parse::<AlgorithmVersion>().is_err());
        assert_eq!(AlgorithmVersion::default(), AlgorithmVersion::V3);
    }

    #[test]
    fn algorithm_version_deserializes_through_parse() {
        let version: AlgorithmVersion = serde_json::from_str(r#""V1""#).unwrap();
        assert_eq!(version, AlgorithmVersion::V1);
        let err = serde_json::from_str::<AlgorithmVersion>(r#""v4""#).unwrap_err();
        assert!(err.to_string().starts_with("unknown algorithm version"), "{err}");
    }

    // ── Hue ──────────────────────────────────────────────────────────────

    #[test]
    fn adjust_hue_wraps() {
        let t = ColorTransform::new(RED).with_hue_shift(180.0);
        assert!(approx_eq(t.adjust_hue(0.0), 180.0, 1e-9));
        assert!(approx_eq(t.adjust_hue(270.0), 90.0, 1e-9));
        assert!(approx_eq(t.adjust_hue(180.0), 0.0, 1e-9));
    }

    #[test]
    fn adjust_hue_always_in_range() {
        for shift in [-1080.0, -361.0, -90.0, 0.0, 45.0, 359.9, 720.5] {
            let t = ColorTransform::new(RED).with_hue_shift(shift);
            for hue in [0.0, 10.0, 200.0, 359.99] {
                let h = t.adjust_hue(hue);
                assert!((0.0..360.0).contains(&h), "shift {shift} hue {hue} -> {h}");
            }
        }
    }

    // ── Chroma ───────────────────────────────────────────────────────────

    #[test]
    fn adjust_chroma_by_version() {
        let base = ColorTransform::new(RED);
        let v1 = base.with_algorithm(AlgorithmVersion::V1);
        let v2 = base.with_algorithm(AlgorithmVersion::V2);
        let v3 = base.with_algorithm(AlgorithmVersion::V3);
        assert!(approx_eq(v1.adjust_chroma(100.0), 100.0, 1e-12));
        assert!(v2.adjust_chroma(100.0) < 100.0);
        assert!(v3.adjust_chroma(100.0) < 100.0);
    }

    #[test]
    fn damping_weakest_at_midtone() {
        for version in [AlgorithmVersion::V2, AlgorithmVersion::V3] {
            let at = |l| {
                ColorTransform::new(RED)
                    .with_algorithm(version)
                    .with_lightness(l)
                    .adjust_chroma(80.0)
            };
            assert!(at(50.0) >= at(5.0), "{version}");
            assert!(at(50.0) >= at(95.0), "{version}");
        }
    }

    #[test]
    fn v2_vanishes_at_extremes() {
        let f = AlgorithmVersion::V2;
        assert!(approx_eq(f.chroma_factor(0.0), 0.0, 1e-12));
        assert!(approx_eq(f.chroma_factor(100.0), 0.0, 1e-12));
        assert!(approx_eq(f.chroma_factor(50.0), 1.0, 1e-12));
    }

    // ── Conversions ──────────────────────────────────────────────────────

    #[test]
    fn alpha_variants_reproduce_source_without_shift() {
        let src = Rgb::new(200.0, 100.0, 50.0);
        let t = ColorTransform::new(src)
            .with_algorithm(AlgorithmVersion::V1)
            .with_alpha(0.4);
        for space in ColorSpace::ALL {
            let out = t.convert_with_alpha(space);
            assert_rgb_close(out.rgb, src, 1.01);
            assert!(approx_eq(out.alpha, 0.4, 1e-12), "{space}");
        }
    }

    #[test]
    fn lightness_override_at_source_lightness_roundtrips() {
        let src = Rgb::new(18.0, 52.0, 86.0);
        let v1 = ColorTransform::new(src).with_algorithm(AlgorithmVersion::V1);
        assert_rgb_close(v1.with_lightness(src.to_lch()[0]).lch(), src, 1.01);
        assert_rgb_close(v1.with_lightness(src.to_lab()[0]).lab(), src, 1.01);
        assert_rgb_close(v1.with_lightness(src.to_oklch()[0] * 100.0).oklch(), src, 1.01);
        assert_rgb_close(v1.with_lightness(src.to_oklab()[0] * 100.0).oklab(), src, 1.01);
        assert_rgb_close(v1.with_lightness(src.to_hsl()[2] * 100.0).hsl(), src, 1.01);
        assert_rgb_close(v1.with_lightness(src.to_hsluv()[2]).hsluv(), src, 1.01);
    }

    #[test]
    fn higher_lightness_is_lighter() {
        for space in ColorSpace::ALL {
            let dark = ColorTransform::new(RED).with_lightness(20.0).convert(space);
            let light = ColorTransform::new(RED).with_lightness(80.0).convert(space);
            assert!(light.luminance() > dark.luminance(), "{space}");
        }
    }

    #[test]
    fn outputs_are_displayable() {
        let t = ColorTransform::new(Rgb::new(300.0, -50.0, 1000.0))
            .with_lightness(200.0)
            .with_chroma_shift(-150.0);
        for space in ColorSpace::ALL {
            let out = t.convert(space);
            assert!(out.is_in_gamut(), "{space}: {out:?}");
            assert!(!out.r.is_nan() && !out.g.is_nan() && !out.b.is_nan());
        }
    }

    #[test]
    fn lab_hue_shift_rotates() {
        let t = ColorTransform::new(RED)
            .with_algorithm(AlgorithmVersion::V1)
            .with_hue_shift(90.0);
        let [_, a, b] = RED.to_lab();
        let [_, na, nb] = t.laba().rgb.to_lab();
        // A quarter turn has to land well away from red.
        assert!((na - a).abs() + (nb - b).abs() > 10.0);
    }

    // ── Vision and compositing ───────────────────────────────────────────

    #[test]
    fn source_passthrough_with_vision() {
        let t = ColorTransform::new(RED).with_vision(VisionMode::Protanopia);
        assert_eq!(t.source(), Rgb::new(145.0, 142.0, 0.0));
        assert_eq!(ColorTransform::new(RED).source(), RED);
        assert_eq!(t.simulate_hex(RED), "#918e00");
    }

    #[test]
    fn mix_translucent_then_simulates() {
        let t = ColorTransform::new(RED).with_vision(VisionMode::Protanopia);
        let a = Rgba::new(255.0, 0.0, 0.0, 0.5);
        let b = Rgba::new(0.0, 255.0, 0.0, 1.0);
        let blend = Rgb::new(128.0, 128.0, 0.0);
        let mixed = t.mix_colors_rgb(a, b);
        assert_eq!(mixed, VisionMode::Protanopia.simulate(blend));
        assert_ne!(mixed, blend);
    }

    #[test]
    fn mix_opaque_returns_a() {
        let t = ColorTransform::new(RED);
        let a = Rgba::new(10.0, 20.0, 30.0, 1.0);
        let b = Rgba::new(200.0, 200.0, 200.0, 1.0);
        assert_eq!(t.mix_colors_rgb(a, b), a.rgb);
    }

    #[test]
    fn mix_transparent_returns_b() {
        let t = ColorTransform::new(RED);
        let a = Rgba::new(10.0, 20.0, 30.0, 0.0);
        let b = Rgba::new(200.0, 100.0, 50.0, 1.0);
        assert_eq!(t.mix_colors_rgb(a, b), b.rgb);
    }

    #[test]
    fn mix_half_red_over_green() {
        let t = ColorTransform::new(RED);
        let out = t.mix_colors_rgb(
            Rgba::new(255.0, 0.0, 0.0, 0.5),
            Rgba::new(0.0, 255.0, 0.0, 1.0),
        );
        assert_eq!(out, Rgb::new(128.0, 128.0, 0.0));
    }

    #[test]
    fn mix_hex_invalid_inputs_pass_through() {
        let t = ColorTransform::new(RED);
        assert_eq!(t.mix_colors_hex("nope", "#00ff00"), "nope");
        assert_eq!(t.mix_colors_hex("#ff0000", "zz"), "zz");
        assert_eq!(t.mix_colors_hex("#FF0000", "#00FF00"), "#ff0000");
        assert_eq!(t.mix_colors_hex("#ff000080", "#00ff00"), "#807f00");
    }
}
