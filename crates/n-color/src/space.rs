// SPDX-License-Identifier: MIT
//
// Color space conversions.
//
// Single-character variable names (r, g, b, l, c, h, a, s, m, u, v) are the
// standard mathematical convention in color science. Renaming them would
// make the code harder to compare against reference implementations.
#![allow(clippy::many_single_char_names)]
//
// Every representation the palette tree exposes is derived here from an
// sRGB triple on the 0–255 scale:
//
//   sRGB ↔ Linear sRGB ↔ XYZ (D65) ↔ CIE LAB ↔ CIE LCH
//   sRGB ↔ Linear sRGB ↔ LMS ↔ OKLAB ↔ OKLCH
//   sRGB ↔ Linear sRGB ↔ XYZ ↔ LUV ↔ LCHuv ↔ HSLuv
//   sRGB ↔ HSL
//
// All functions are total. Inverse conversions return unclamped channels;
// clamping happens where a color is displayed. Hue is undefined for
// achromatic colors; we report 0 there instead of NaN.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::rgb::{Rgb, linear_to_srgb, srgb_to_linear};

// ─── ColorSpace ──────────────────────────────────────────────────────────────

/// The space a palette's shades are generated in.
///
/// The space decides which coordinates a scale stop overrides (lightness)
/// and which are carried over from the source (hue, chroma/saturation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ColorSpace {
    /// CIE LCH (D65), lightness 0–100.
    #[default]
    #[serde(rename = "LCH")]
    Lch,
    /// OKLCH, lightness 0–1.
    #[serde(rename = "OKLCH")]
    Oklch,
    /// CIE LAB (D65).
    #[serde(rename = "LAB")]
    Lab,
    /// OKLAB.
    #[serde(rename = "OKLAB")]
    Oklab,
    /// HSL, saturation and lightness 0–1.
    #[serde(rename = "HSL")]
    Hsl,
    /// HSLuv, saturation and lightness 0–100.
    #[serde(rename = "HSLUV")]
    Hsluv,
}

impl ColorSpace {
    /// Every generation space, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Lch,
        Self::Oklch,
        Self::Lab,
        Self::Oklab,
        Self::Hsl,
        Self::Hsluv,
    ];

    /// Wire name (`"LCH"`, `"OKLCH"`, …).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lch => "LCH",
            Self::Oklch => "OKLCH",
            Self::Lab => "LAB",
            Self::Oklab => "OKLAB",
            Self::Hsl => "HSL",
            Self::Hsluv => "HSLUV",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|space| space.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownColorSpace(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ColorSpace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

// ─── Rgb accessors ───────────────────────────────────────────────────────────

impl Rgb {
    /// CIE `[L, C, H]`.
    #[must_use]
    pub fn to_lch(self) -> [f64; 3] {
        let [l, a, b] = rgb_to_lab(self);
        let (c, h) = ab_to_ch(a, b);
        [l, c, h]
    }

    /// `[L, C, H]` with L in 0–1.
    #[must_use]
    pub fn to_oklch(self) -> [f64; 3] {
        let [l, a, b] = rgb_to_oklab(self);
        let (c, h) = ab_to_ch(a, b);
        [l, c, h]
    }

    /// CIE `[L, a, b]`.
    #[must_use]
    pub fn to_lab(self) -> [f64; 3] {
        rgb_to_lab(self)
    }

    /// `[L, a, b]` with L in 0–1.
    #[must_use]
    pub fn to_oklab(self) -> [f64; 3] {
        rgb_to_oklab(self)
    }

    /// `[H, S, L]` with S and L in 0–1.
    #[must_use]
    pub fn to_hsl(self) -> [f64; 3] {
        rgb_to_hsl(self)
    }

    /// `[H, S, L]` with S and L in 0–100.
    #[must_use]
    pub fn to_hsluv(self) -> [f64; 3] {
        rgb_to_hsluv(self)
    }
}

// ─── Polar helpers ───────────────────────────────────────────────────────────

/// Below this chroma the hue is meaningless.
const ACHROMATIC: f64 = 5e-5;

/// Normalize a hue angle to [0, 360).
#[inline]
#[must_use]
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if h >= 360.0 { 0.0 } else { h }
}

#[inline]
fn ab_to_ch(a: f64, b: f64) -> (f64, f64) {
    let c = a.hypot(b);
    let h = if c < ACHROMATIC || c.is_nan() {
        0.0
    } else {
        normalize_hue(b.atan2(a).to_degrees())
    };
    (c, h)
}

#[inline]
fn ch_to_ab(c: f64, h: f64) -> (f64, f64) {
    let h = if h.is_nan() { 0.0 } else { h.to_radians() };
    (c * h.cos(), c * h.sin())
}

#[inline]
fn to_linear(rgb: Rgb) -> (f64, f64, f64) {
    let (r, g, b) = rgb.to_unit();
    (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

#[inline]
fn from_linear(r: f64, g: f64, b: f64) -> Rgb {
    Rgb::from_unit(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

// ─── CIE LAB / LCH ───────────────────────────────────────────────────────────
//
// D65 reference white, sRGB primaries. t0..t3 are the knees of the CIE
// lightness companding curve (4/29, 6/29, 3·(6/29)², (6/29)³).

const XN: f64 = 0.950_470;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_830;

const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > T3 { t.cbrt() } else { t / T2 + T0 }
}

#[inline]
fn lab_f_inv(t: f64) -> f64 {
    if t > T1 { t * t * t } else { T2 * (t - T0) }
}

fn rgb_to_xyz(rgb: Rgb) -> (f64, f64, f64) {
    let (r, g, b) = to_linear(rgb);
    let x = 0.180_437_5f64.mul_add(b, 0.412_456_4f64.mul_add(r, 0.357_576_1 * g));
    let y = 0.072_175_0f64.mul_add(b, 0.212_672_9f64.mul_add(r, 0.715_152_2 * g));
    let z = 0.950_304_1f64.mul_add(b, 0.019_333_9f64.mul_add(r, 0.119_192_0 * g));
    (x, y, z)
}

fn xyz_to_rgb(x: f64, y: f64, z: f64) -> Rgb {
    let r = (-0.498_531_4f64).mul_add(z, 3.240_454_2f64.mul_add(x, -(1.537_138_5 * y)));
    let g = 0.041_556_0f64.mul_add(z, (-0.969_266_0f64).mul_add(x, 1.876_010_8 * y));
    let b = 1.057_225_2f64.mul_add(z, 0.055_643_4f64.mul_add(x, -(0.204_025_9 * y)));
    from_linear(r, g, b)
}

/// sRGB → CIE `[L, a, b]`.
#[must_use]
pub fn rgb_to_lab(rgb: Rgb) -> [f64; 3] {
    let (x, y, z) = rgb_to_xyz(rgb);
    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);
    let l = 116.0f64.mul_add(fy, -16.0).max(0.0);
    [l, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// CIE `[L, a, b]` → sRGB (unclamped).
#[must_use]
pub fn lab_to_rgb([l, a, b]: [f64; 3]) -> Rgb {
    let a = if a.is_nan() { 0.0 } else { a };
    let b = if b.is_nan() { 0.0 } else { b };
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    xyz_to_rgb(XN * lab_f_inv(fx), YN * lab_f_inv(fy), ZN * lab_f_inv(fz))
}

/// CIE `[L, C, H]` → sRGB (unclamped).
#[must_use]
pub fn lch_to_rgb([l, c, h]: [f64; 3]) -> Rgb {
    let (a, b) = ch_to_ab(c, h);
    lab_to_rgb([l, a, b])
}

// ─── OKLAB / OKLCH ───────────────────────────────────────────────────────────
//
// The OKLAB ↔ linear sRGB conversion goes through an intermediate LMS
// (Long, Medium, Short cone response) space. Matrices are from Björn
// Ottosson's reference derivation.

/// sRGB → `[L, a, b]` with L in 0–1.
#[must_use]
pub fn rgb_to_oklab(rgb: Rgb) -> [f64; 3] {
    let (r, g, b) = to_linear(rgb);

    // Linear sRGB → LMS
    let l = 0.051_445_992_9f64.mul_add(b, 0.412_221_470_8f64.mul_add(r, 0.536_332_536_3 * g));
    let m = 0.107_396_956_6f64.mul_add(b, 0.211_903_498_2f64.mul_add(r, 0.680_699_545_1 * g));
    let s = 0.629_978_700_5f64.mul_add(b, 0.088_302_461_9f64.mul_add(r, 0.281_718_837_6 * g));

    // Cube root (LMS → OKLAB intermediate)
    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    [
        0.004_072_046_8f64.mul_add(-s_, 0.210_454_255_3f64.mul_add(l_, 0.793_617_785_0 * m_)),
        0.450_593_709_9f64.mul_add(s_, 1.977_998_495_1f64.mul_add(l_, -(2.428_592_205_0 * m_))),
        0.808_675_766_0f64.mul_add(-s_, 0.025_904_037_1f64.mul_add(l_, 0.782_771_766_2 * m_)),
    ]
}

/// `[L, a, b]` → sRGB (unclamped).
#[must_use]
pub fn oklab_to_rgb([l_ok, a, b]: [f64; 3]) -> Rgb {
    let a = if a.is_nan() { 0.0 } else { a };
    let b = if b.is_nan() { 0.0 } else { b };

    // OKLAB → LMS (cube root domain)
    let l_ = 0.215_803_757_3f64.mul_add(b, 0.396_337_777_4f64.mul_add(a, l_ok));
    let m_ = (-0.063_854_172_8f64).mul_add(b, (-0.105_561_345_8f64).mul_add(a, l_ok));
    let s_ = (-1.291_485_548_0f64).mul_add(b, (-0.089_484_177_5f64).mul_add(a, l_ok));

    // Cube
    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    // LMS → Linear sRGB
    let r = 0.230_969_929_2f64.mul_add(s, 4.076_741_662_1f64.mul_add(l, -(3.307_711_591_3 * m)));
    let g = 0.341_319_396_5f64.mul_add(-s, (-1.268_438_004_6f64).mul_add(l, 2.609_757_401_1 * m));
    let bl = 1.707_614_701_0f64.mul_add(s, (-0.004_196_086_3f64).mul_add(l, -(0.703_418_614_7 * m)));

    from_linear(r, g, bl)
}

/// `[L, C, H]` (L in 0–1) → sRGB (unclamped).
#[must_use]
pub fn oklch_to_rgb([l, c, h]: [f64; 3]) -> Rgb {
    let (a, b) = ch_to_ab(c, h);
    oklab_to_rgb([l, a, b])
}

// ─── HSL ─────────────────────────────────────────────────────────────────────

/// sRGB → `[H, S, L]`, S and L in 0–1.
#[must_use]
pub fn rgb_to_hsl(rgb: Rgb) -> [f64; 3] {
    let (r, g, b) = rgb.to_unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    if delta.abs() < f64::EPSILON {
        return [0.0, 0.0, l];
    }

    let s = if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    #[allow(clippy::float_cmp)]
    let h = if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    [normalize_hue(h * 60.0), s, l]
}

/// `[H, S, L]` (S and L in 0–1) → sRGB (unclamped).
#[must_use]
pub fn hsl_to_rgb([h, s, l]: [f64; 3]) -> Rgb {
    if s.abs() < f64::EPSILON || s.is_nan() {
        return Rgb::from_unit(l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l.mul_add(-s, l + s) };
    let p = 2.0f64.mul_add(l, -q);
    let h = if h.is_nan() { 0.0 } else { normalize_hue(h) / 360.0 };

    Rgb::from_unit(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

#[inline]
fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if 6.0 * t < 1.0 {
        ((q - p) * 6.0).mul_add(t, p)
    } else if 2.0 * t < 1.0 {
        q
    } else if 3.0 * t < 2.0 {
        ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p)
    } else {
        p
    }
}

// ─── HSLuv ───────────────────────────────────────────────────────────────────
//
// HSLuv is CIE LCHuv with chroma rescaled to a percentage of the largest
// chroma the sRGB gamut allows at that lightness and hue. The gamut
// boundary is six lines in the (u, v) plane, one per RGB channel at 0 and 1.

const M: [[f64; 3]; 3] = [
    [3.240_969_941_904_521, -1.537_383_177_570_093, -0.498_610_760_293],
    [-0.969_243_636_280_87, 1.875_967_501_507_72, 0.041_555_057_407_175],
    [0.055_630_079_696_993, -0.203_976_958_888_97, 1.056_971_514_242_878],
];

const M_INV: [[f64; 3]; 3] = [
    [0.412_390_799_265_95, 0.357_584_339_383_87, 0.180_480_788_401_83],
    [0.212_639_005_871_51, 0.715_168_678_767_75, 0.072_192_315_360_733],
    [0.019_330_818_715_591, 0.119_194_779_794_62, 0.950_532_152_249_66],
];

const REF_U: f64 = 0.197_830_006_642_83;
const REF_V: f64 = 0.468_319_994_938_79;
const KAPPA: f64 = 903.296_296_2;
const EPSILON: f64 = 0.008_856_451_6;

#[inline]
fn dot(row: [f64; 3], (x, y, z): (f64, f64, f64)) -> f64 {
    row[2].mul_add(z, row[0].mul_add(x, row[1] * y))
}

#[inline]
fn y_to_l(y: f64) -> f64 {
    if y <= EPSILON {
        y * KAPPA
    } else {
        116.0f64.mul_add(y.cbrt(), -16.0)
    }
}

#[inline]
fn l_to_y(l: f64) -> f64 {
    if l <= 8.0 {
        l / KAPPA
    } else {
        ((l + 16.0) / 116.0).powi(3)
    }
}

/// Gamut boundary lines `(slope, intercept)` at lightness `l`.
fn bounds(l: f64) -> [(f64, f64); 6] {
    let sub1 = (l + 16.0).powi(3) / 1_560_896.0;
    let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };

    let mut lines = [(0.0, 0.0); 6];
    for (c, row) in M.iter().enumerate() {
        let [m1, m2, m3] = *row;
        for (i, t) in [0.0, 1.0].into_iter().enumerate() {
            let top1 = 284_517.0f64.mul_add(m1, -(94_839.0 * m3)) * sub2;
            let top2 = 731_718.0f64.mul_add(m1, 838_422.0f64.mul_add(m3, 769_860.0 * m2)) * l * sub2
                - 769_860.0 * t * l;
            let bottom = 632_260.0f64.mul_add(m3, -(126_452.0 * m2)).mul_add(sub2, 126_452.0 * t);
            lines[c * 2 + i] = (top1 / bottom, top2 / bottom);
        }
    }
    lines
}

/// Largest in-gamut LCHuv chroma at lightness `l` and hue `h` (degrees).
fn max_chroma_for(l: f64, h: f64) -> f64 {
    let h = h.to_radians();
    let (sin, cos) = h.sin_cos();
    bounds(l)
        .iter()
        .map(|&(slope, intercept)| intercept / slope.mul_add(-cos, sin))
        .filter(|len| *len >= 0.0)
        .fold(f64::MAX, f64::min)
}

fn rgb_to_lchuv(rgb: Rgb) -> (f64, f64, f64) {
    let xyz = to_linear(rgb);
    let (x, y, z) = (dot(M_INV[0], xyz), dot(M_INV[1], xyz), dot(M_INV[2], xyz));

    let l = y_to_l(y);
    if l == 0.0 || l.is_nan() {
        return (0.0, 0.0, 0.0);
    }
    let divider = 3.0f64.mul_add(z, 15.0f64.mul_add(y, x));
    let var_u = 4.0 * x / divider;
    let var_v = 9.0 * y / divider;
    let u = 13.0 * l * (var_u - REF_U);
    let v = 13.0 * l * (var_v - REF_V);

    let c = u.hypot(v);
    let h = if c < 1e-8 {
        0.0
    } else {
        normalize_hue(v.atan2(u).to_degrees())
    };
    (l, c, h)
}

fn lchuv_to_rgb(l: f64, c: f64, h: f64) -> Rgb {
    if l <= 0.0 || l.is_nan() {
        return Rgb::BLACK;
    }
    let (u, v) = ch_to_ab(c, h);

    let var_u = u / (13.0 * l) + REF_U;
    let var_v = v / (13.0 * l) + REF_V;
    let y = l_to_y(l);
    let x = -(9.0 * y * var_u) / (var_u - 4.0).mul_add(var_v, -(var_u * var_v));
    let z = (9.0f64.mul_add(y, -(15.0 * var_v * y)) - var_v * x) / (3.0 * var_v);

    let xyz = (x, y, z);
    from_linear(dot(M[0], xyz), dot(M[1], xyz), dot(M[2], xyz))
}

/// sRGB → `[H, S, L]`, S and L in 0–100.
#[must_use]
pub fn rgb_to_hsluv(rgb: Rgb) -> [f64; 3] {
    let (l, c, h) = rgb_to_lchuv(rgb);
    if l > 99.999_999_9 {
        return [h, 0.0, 100.0];
    }
    if l < 1e-8 {
        return [h, 0.0, 0.0];
    }
    [h, c / max_chroma_for(l, h) * 100.0, l]
}

/// `[H, S, L]` (S and L in 0–100) → sRGB (unclamped).
#[must_use]
pub fn hsluv_to_rgb([h, s, l]: [f64; 3]) -> Rgb {
    if l > 99.999_999_9 {
        return Rgb::WHITE;
    }
    if l < 1e-8 {
        return Rgb::BLACK;
    }
    let c = max_chroma_for(l, h) / 100.0 * s;
    lchuv_to_rgb(l, c, h)
}

// ─── Hue rotation in radians ─────────────────────────────────────────────────

/// Rotate a Cartesian `(a, b)` chroma vector by `shift_deg`, scaling its
/// length by `chroma_scale`.
///
/// The angle comes from `atan(b / a)`, which only covers the right half
/// plane; after the shift the angle saturates at ±π, and points that
/// started with `a < 0` are mirrored back into the left half plane.
/// An undefined angle (`a = b = 0`) yields the origin.
#[must_use]
pub fn rotate_ab(a: f64, b: f64, shift_deg: f64, chroma_scale: f64) -> (f64, f64) {
    let chroma = a.hypot(b) * chroma_scale;
    let h = ((b / a).atan() + shift_deg * (PI / 180.0)).clamp(-PI, PI);

    let (mut na, mut nb) = (chroma * h.cos(), chroma * h.sin());
    if a < 0.0 {
        na = -na;
        nb = -nb;
    }

    (
        if na.is_nan() { 0.0 } else { na },
        if nb.is_nan() { 0.0 } else { nb },
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn assert_rgb_close(a: Rgb, b: Rgb, eps: f64) {
        assert!(
            approx_eq(a.r, b.r, eps) && approx_eq(a.g, b.g, eps) && approx_eq(a.b, b.b, eps),
            "{a:?} != {b:?}"
        );
    }

    const SAMPLES: [Rgb; 8] = [
        Rgb::new(255.0, 0.0, 0.0),
        Rgb::new(0.0, 255.0, 0.0),
        Rgb::new(0.0, 0.0, 255.0),
        Rgb::new(200.0, 100.0, 50.0),
        Rgb::new(18.0, 52.0, 86.0),
        Rgb::new(128.0, 128.0, 128.0),
        Rgb::new(250.0, 240.0, 10.0),
        Rgb::new(90.0, 20.0, 160.0),
    ];

    // ── Parsing ──────────────────────────────────────────────────────────

    #[test]
    fn color_space_parses_case_insensitive() {
        assert_eq!("oklch".parse::<ColorSpace>(), Ok(ColorSpace::Oklch));
        assert_eq!("HSLUV".parse::<ColorSpace>(), Ok(ColorSpace::Hsluv));
    }

    #[test]
    fn color_space_unknown_key_fails() {
        assert_eq!(
            "P3".parse::<ColorSpace>(),
            Err(Error::UnknownColorSpace("P3".to_string()))
        );
    }

    #[test]
    fn color_space_deserializes_through_parse() {
        let space: ColorSpace = serde_json::from_str(r#""hsluv""#).unwrap();
        assert_eq!(space, ColorSpace::Hsluv);
        let err = serde_json::from_str::<ColorSpace>(r#""P3""#).unwrap_err();
        assert!(err.to_string().starts_with("unknown color space: \"P3\""), "{err}");
        assert_eq!(serde_json::to_string(&ColorSpace::Oklab).unwrap(), r#""OKLAB""#);
    }

    // ── Known values ─────────────────────────────────────────────────────

    #[test]
    fn red_lch_reference() {
        let [l, c, h] = Rgb::new(255.0, 0.0, 0.0).to_lch();
        assert!(approx_eq(l, 53.24, 0.05), "L {l}");
        assert!(approx_eq(c, 104.55, 0.2), "C {c}");
        assert!(approx_eq(h, 40.0, 0.2), "H {h}");
    }

    #[test]
    fn red_oklch_reference() {
        let [l, c, h] = Rgb::new(255.0, 0.0, 0.0).to_oklch();
        assert!(approx_eq(l, 0.628, 0.001), "L {l}");
        assert!(approx_eq(c, 0.2577, 0.001), "C {c}");
        assert!(approx_eq(h, 29.23, 0.1), "H {h}");
    }

    #[test]
    fn red_hsluv_reference() {
        let [h, s, l] = Rgb::new(255.0, 0.0, 0.0).to_hsluv();
        assert!(approx_eq(h, 12.18, 0.05), "H {h}");
        assert!(approx_eq(s, 100.0, 0.05), "S {s}");
        assert!(approx_eq(l, 53.24, 0.05), "L {l}");
    }

    #[test]
    fn blue_hsl_reference() {
        let [h, s, l] = Rgb::new(0.0, 0.0, 255.0).to_hsl();
        assert!(approx_eq(h, 240.0, 1e-9));
        assert!(approx_eq(s, 1.0, 1e-9));
        assert!(approx_eq(l, 0.5, 1e-9));
    }

    #[test]
    fn white_and_black_lightness() {
        assert!(approx_eq(Rgb::WHITE.to_lab()[0], 100.0, 0.01));
        assert!(approx_eq(Rgb::BLACK.to_lab()[0], 0.0, 0.01));
        assert!(approx_eq(Rgb::WHITE.to_oklab()[0], 1.0, 0.001));
        assert!(approx_eq(Rgb::WHITE.to_hsluv()[2], 100.0, 0.01));
    }

    #[test]
    fn achromatic_hue_is_zero_not_nan() {
        let gray = Rgb::new(128.0, 128.0, 128.0);
        for h in [gray.to_lch()[2], gray.to_oklch()[2], gray.to_hsl()[0], gray.to_hsluv()[0]] {
            assert!(approx_eq(h, 0.0, 1e-9), "hue {h}");
        }
        assert!(approx_eq(Rgb::BLACK.to_hsluv()[1], 0.0, 1e-9));
    }

    // ── Round trips ──────────────────────────────────────────────────────

    #[test]
    fn lab_roundtrip() {
        for c in SAMPLES {
            assert_rgb_close(lab_to_rgb(c.to_lab()), c, 0.05);
        }
    }

    #[test]
    fn lch_roundtrip() {
        for c in SAMPLES {
            assert_rgb_close(lch_to_rgb(c.to_lch()), c, 0.05);
        }
    }

    #[test]
    fn oklab_roundtrip() {
        for c in SAMPLES {
            assert_rgb_close(oklab_to_rgb(c.to_oklab()), c, 0.05);
        }
    }

    #[test]
    fn oklch_roundtrip() {
        for c in SAMPLES {
            assert_rgb_close(oklch_to_rgb(c.to_oklch()), c, 0.05);
        }
    }

    #[test]
    fn hsl_roundtrip() {
        for c in SAMPLES {
            assert_rgb_close(hsl_to_rgb(c.to_hsl()), c, 1e-6);
        }
    }

    #[test]
    fn hsluv_roundtrip() {
        for c in SAMPLES {
            assert_rgb_close(hsluv_to_rgb(c.to_hsluv()), c, 0.05);
        }
    }

    // ── Hue helpers ──────────────────────────────────────────────────────

    #[test]
    fn normalize_hue_range() {
        assert!(approx_eq(normalize_hue(370.0), 10.0, 1e-9));
        assert!(approx_eq(normalize_hue(-30.0), 330.0, 1e-9));
        assert!(approx_eq(normalize_hue(720.0), 0.0, 1e-9));
        assert!(normalize_hue(-1e-20) < 360.0);
    }

    #[test]
    fn rotate_ab_identity_preserves_quadrant() {
        for (a, b) in [(3.0, 4.0), (-3.0, 4.0), (-3.0, -4.0), (3.0, -4.0)] {
            let (na, nb) = rotate_ab(a, b, 0.0, 1.0);
            assert!(approx_eq(na, a, 1e-9) && approx_eq(nb, b, 1e-9), "({a}, {b}) -> ({na}, {nb})");
        }
    }

    #[test]
    fn rotate_ab_negative_a_on_axis() {
        let (na, nb) = rotate_ab(-5.0, 0.0, 0.0, 1.0);
        assert!(approx_eq(na, -5.0, 1e-9) && approx_eq(nb, 0.0, 1e-9));
    }

    #[test]
    fn rotate_ab_half_turn_saturates_at_pi() {
        let (na, nb) = rotate_ab(3.0, 4.0, 180.0, 1.0);
        assert!(approx_eq(na, -5.0, 1e-9) && approx_eq(nb, 0.0, 1e-9), "({na}, {nb})");
    }

    #[test]
    fn rotate_ab_left_half_plane_saturates_at_minus_pi() {
        let (na, nb) = rotate_ab(-3.0, 4.0, -270.0, 1.0);
        assert!(approx_eq(na, 5.0, 1e-9) && approx_eq(nb, 0.0, 1e-9), "({na}, {nb})");
    }

    #[test]
    fn rotate_ab_origin_is_origin() {
        assert_eq!(rotate_ab(0.0, 0.0, 45.0, 1.0), (0.0, 0.0));
    }

    #[test]
    fn rotate_ab_scales_chroma() {
        let (na, nb) = rotate_ab(3.0, 4.0, 0.0, 0.5);
        assert!(approx_eq(na.hypot(nb), 2.5, 1e-9));
    }
}
