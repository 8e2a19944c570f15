// SPDX-License-Identifier: MIT
//
// sRGB channel types, the exchange format of the whole engine.
//
// Channels are stored as f64 on the 0–255 scale, exactly as authored.
// Nothing here rejects out-of-gamut values: negative channels or
// channels above 255 flow through every formula untouched, and are only
// clamped at the display boundary (hex strings, 8-bit triples, GL
// floats). Callers that care can ask `is_in_gamut` first.
//
// Hex parsing accepts the four CSS short/long forms, with or without `#`.

use std::fmt;

use crate::error::{Error, Result};

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An sRGB color with channels on the 0–255 scale.
///
/// # Examples
///
/// ```
/// use n_color::Rgb;
///
/// let red = Rgb::from_unit(1.0, 0.0, 0.0);
/// assert_eq!(red.to_hex(), "#ff0000");
///
/// let parsed = Rgb::from_hex("#f80").unwrap();
/// assert_eq!(parsed.to_rgb8(), [255, 136, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255.0, 255.0, 255.0);

    /// Create a color from 0–255 channels.
    #[inline]
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 0.0–1.0 channels (the authoring format).
    #[inline]
    #[must_use]
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self::new(r * 255.0, g * 255.0, b * 255.0)
    }

    /// Create a color from 8-bit channels.
    #[inline]
    #[must_use]
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(f64::from(r), f64::from(g), f64::from(b))
    }

    /// Parse a hex string, discarding any alpha digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHex`] if the string is not a valid hex color.
    pub fn from_hex(s: &str) -> Result<Self> {
        Rgba::from_hex(s).map(|c| c.rgb)
    }

    /// Channels as 0.0–1.0 floats (unclamped).
    #[inline]
    #[must_use]
    pub fn to_unit(self) -> (f64, f64, f64) {
        (self.r / 255.0, self.g / 255.0, self.b / 255.0)
    }

    /// Channels as an array, unmodified.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Clamp every channel into 0–255.
    #[inline]
    #[must_use]
    pub const fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 255.0),
            self.g.clamp(0.0, 255.0),
            self.b.clamp(0.0, 255.0),
        )
    }

    /// Clamp and round to whole channel values, i.e. the color as it would be
    /// displayed. NaN channels become 0.
    #[must_use]
    pub fn rounded(self) -> Self {
        let [r, g, b] = self.to_rgb8();
        Self::from_rgb8([r, g, b])
    }

    /// Convert to 8-bit channels with clamping and rounding.
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    /// Whether every channel lies inside 0–255.
    #[must_use]
    pub fn is_in_gamut(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=255.0).contains(c))
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// GL-normalized `[r, g, b, 1.0]` of the displayed color.
    #[must_use]
    pub fn to_gl(self) -> [f64; 4] {
        self.with_alpha(1.0).to_gl()
    }

    /// Attach an alpha value.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba { rgb: self, alpha }
    }

    /// WCAG 2.1 relative luminance of the displayed color, 0.0–1.0.
    #[must_use]
    pub fn luminance(self) -> f64 {
        let (r, g, b) = self.clamped().to_unit();
        0.2126f64.mul_add(
            srgb_to_linear(r),
            0.7152f64.mul_add(srgb_to_linear(g), 0.0722 * srgb_to_linear(b)),
        )
    }

    /// Euclidean distance in 0–255 RGB space between the displayed colors.
    ///
    /// Values below ~4 are hard to tell apart side by side.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let a = self.rounded();
        let b = other.rounded();
        let dr = a.r - b.r;
        let dg = a.g - b.g;
        let db = a.b - b.b;
        db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(channels: [u8; 3]) -> Self {
        Self::from_rgb8(channels)
    }
}

// ─── Rgba ────────────────────────────────────────────────────────────────────

/// An [`Rgb`] color with alpha (0.0 transparent to 1.0 opaque).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    /// Create from 0–255 channels and a 0.0–1.0 alpha.
    #[inline]
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            alpha,
        }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (with or without `#`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHex`] if the string is not a valid hex color.
    pub fn from_hex(s: &str) -> Result<Self> {
        parse_hex(s).ok_or_else(|| Error::InvalidHex(s.to_string()))
    }

    /// Whether alpha is at least 1.0.
    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            self.rgb.to_hex()
        } else {
            let a = to_u8(self.alpha.clamp(0.0, 1.0) * 255.0);
            format!("{}{a:02x}", self.rgb.to_hex())
        }
    }

    /// GL-normalized `[r, g, b, a]` of the displayed color.
    #[must_use]
    pub fn to_gl(self) -> [f64; 4] {
        let [r, g, b] = self.rgb.to_rgb8();
        [
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            self.alpha.clamp(0.0, 1.0),
        ]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── Linear sRGB ↔ sRGB (Gamma) ─────────────────────────────────────────────
//
// sRGB uses a piecewise transfer function to encode linear light into the
// perceptual domain. Both directions extend linearly below the knee, so
// negative (out-of-gamut) components survive a round trip.

/// Convert a single linear sRGB component to sRGB (apply gamma).
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055f64.mul_add(c.powf(1.0 / 2.4), -0.055)
    }
}

/// Convert a single sRGB component to linear sRGB (remove gamma).
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<Rgba> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    let bytes = s.as_bytes();

    let short = |i: usize| parse_hex_digit(bytes[i]).map(|d| d << 4 | d);
    let long = |i: usize| parse_hex_byte(&bytes[i..i + 2]);

    let (r, g, b, a) = match bytes.len() {
        3 => (short(0)?, short(1)?, short(2)?, 255),
        4 => (short(0)?, short(1)?, short(2)?, short(3)?),
        6 => (long(0)?, long(2)?, long(4)?, 255),
        8 => (long(0)?, long(2)?, long(4)?, long(6)?),
        _ => return None,
    };

    Some(Rgba::new(
        f64::from(r),
        f64::from(g),
        f64::from(b),
        f64::from(a) / 255.0,
    ))
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

/// Round a 0–255 float to a byte, clamping first. NaN maps to 0.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.round().clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
