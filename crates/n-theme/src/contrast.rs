//! Text contrast scoring: WCAG 2.1 ratios and APCA lightness contrast.
//!
//! A [`Contrast`] pairs a background with a text color and answers:
//!
//! - WCAG ratio in [1, 21], tiered A / AA / AAA
//! - APCA Lc magnitude, tiered into seven usage bands
//! - minimum font sizes per weight for that Lc
//! - the neutral background lightness that reaches a target WCAG ratio
//!
//! WCAG works on relative luminance (linearized sRGB). APCA uses its own
//! simple 2.4 power curve and a soft clamp near black, and is polarity
//! aware: dark-on-light and light-on-dark scores differ.

use n_color::space::lch_to_rgb;
use n_color::{Rgb, Rgba};
use serde::Serialize;

use crate::error::Result;

/// Bisection stops once the bracket is narrower than this by default.
pub const DEFAULT_PRECISION: f64 = 0.1;

/// Badge color for a passing score.
pub const PASS_COLOR: Rgb = Rgb::new(
    0.529_411_764_7 * 255.0,
    0.815_686_274_5 * 255.0,
    0.694_117_647_1 * 255.0,
);

/// Badge color for a failing score.
pub const FAIL_COLOR: Rgb = Rgb::new(
    0.827_450_980_4 * 255.0,
    0.701_960_784_3 * 255.0,
    0.780_392_156_9 * 255.0,
);

// ── WCAG ─────────────────────────────────────────────────────────────────────

/// Relative luminance of the displayed color per WCAG 2.1, in [0, 1].
#[must_use]
pub fn relative_luminance(color: Rgb) -> f64 {
    color.rounded().luminance()
}

/// WCAG 2.1 contrast ratio between two colors, in [1, 21].
///
/// The result is the same regardless of argument order.
#[must_use]
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG conformance tier for normal-size text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WcagScore {
    /// Below 4.5:1.
    A,
    /// 4.5:1 up to 7:1.
    #[serde(rename = "AA")]
    Aa,
    /// 7:1 and above.
    #[serde(rename = "AAA")]
    Aaa,
}

impl WcagScore {
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 4.5 {
            Self::A
        } else if ratio < 7.0 {
            Self::Aa
        } else {
            Self::Aaa
        }
    }
}

// ── APCA ─────────────────────────────────────────────────────────────────────

const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_TXT: f64 = 0.62;
const REV_BG: f64 = 0.65;

const BLK_THRS: f64 = 0.022;
const BLK_CLMP: f64 = 1.414;
const SCALE: f64 = 1.14;
const LO_OFFSET: f64 = 0.027;
const LO_CLIP: f64 = 0.1;
const DELTA_Y_MIN: f64 = 0.0005;

/// APCA screen luminance: a plain 2.4 power curve, no linear toe.
#[must_use]
pub fn apca_luminance(color: Rgb) -> f64 {
    let c = color.rounded();
    let y = |v: f64| (v / 255.0).powf(2.4);
    0.072_175_0f64.mul_add(y(c.b), 0.212_672_9f64.mul_add(y(c.r), 0.715_152_2 * y(c.g)))
}

/// Signed APCA lightness contrast (Lc) of `text` over `background`.
///
/// Positive for dark text on a light background, negative for light text
/// on a dark background, 0 when the two are too close to matter.
#[must_use]
pub fn apca_lc(text: Rgb, background: Rgb) -> f64 {
    let soft_clamp = |y: f64| {
        if y > BLK_THRS {
            y
        } else {
            y + (BLK_THRS - y).powf(BLK_CLMP)
        }
    };
    let txt = soft_clamp(apca_luminance(text));
    let bg = soft_clamp(apca_luminance(background));

    if (bg - txt).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let out = if bg > txt {
        let sapc = (bg.powf(NORM_BG) - txt.powf(NORM_TXT)) * SCALE;
        if sapc < LO_CLIP { 0.0 } else { sapc - LO_OFFSET }
    } else {
        let sapc = (bg.powf(REV_BG) - txt.powf(REV_TXT)) * SCALE;
        if sapc > -LO_CLIP { 0.0 } else { sapc + LO_OFFSET }
    };
    out * 100.0
}

/// What an APCA score is good enough for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Usage {
    /// Lc 90+: any text, including long fluent reading.
    FluentText,
    /// Lc 75+: body copy columns.
    ContentText,
    /// Lc 60+: non-body content text.
    BodyText,
    /// Lc 45+: large, heavy headlines.
    Headlines,
    /// Lc 30+: spot text such as placeholders.
    SpotText,
    /// Lc 15+: non-text elements only.
    NonText,
    /// Below Lc 15: not perceivable enough.
    Avoid,
    /// The score was not a number.
    Unknown,
}

impl Usage {
    #[must_use]
    pub fn from_lc(lc: f64) -> Self {
        match lc {
            lc if lc >= 90.0 => Self::FluentText,
            lc if lc >= 75.0 => Self::ContentText,
            lc if lc >= 60.0 => Self::BodyText,
            lc if lc >= 45.0 => Self::Headlines,
            lc if lc >= 30.0 => Self::SpotText,
            lc if lc >= 15.0 => Self::NonText,
            lc if lc < 15.0 => Self::Avoid,
            _ => Self::Unknown,
        }
    }
}

// ── Font lookup ──────────────────────────────────────────────────────────────
//
// Minimum font size (px) per weight 100..900, one row per 5 Lc starting at
// Lc 0. 999 means "do not use for text", 777 means "non-text only".

/// Font weights the lookup table covers.
pub const FONT_WEIGHTS: [u16; 9] = [100, 200, 300, 400, 500, 600, 700, 800, 900];

/// Returned for contrast too low for any use.
pub const FONT_PROHIBITED: f64 = 999.0;

/// Returned for contrast only suitable for non-text elements.
pub const FONT_NON_TEXT: f64 = 777.0;

const FONT_TABLE: [[f64; 9]; 26] = [
    [999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0], // 0
    [999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0], // 5
    [999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0, 999.0], // 10
    [777.0, 777.0, 777.0, 777.0, 777.0, 777.0, 777.0, 777.0, 777.0], // 15
    [777.0, 777.0, 777.0, 777.0, 777.0, 777.0, 777.0, 777.0, 777.0], // 20
    [777.0, 777.0, 777.0, 120.0, 120.0, 108.0, 96.0, 96.0, 96.0],    // 25
    [777.0, 777.0, 120.0, 108.0, 108.0, 96.0, 72.0, 72.0, 72.0],     // 30
    [777.0, 120.0, 108.0, 96.0, 72.0, 60.0, 48.0, 48.0, 48.0],       // 35
    [120.0, 108.0, 96.0, 60.0, 48.0, 42.0, 32.0, 32.0, 32.0],        // 40
    [108.0, 96.0, 72.0, 42.0, 32.0, 28.0, 24.0, 24.0, 24.0],         // 45
    [96.0, 72.0, 60.0, 32.0, 28.0, 24.0, 21.0, 21.0, 21.0],          // 50
    [80.0, 60.0, 48.0, 28.0, 24.0, 21.0, 18.0, 18.0, 18.0],          // 55
    [72.0, 48.0, 42.0, 24.0, 21.0, 18.0, 16.0, 16.0, 18.0],          // 60
    [68.0, 46.0, 32.0, 21.75, 19.0, 17.0, 15.0, 16.0, 18.0],         // 65
    [64.0, 44.0, 28.0, 19.5, 18.0, 16.0, 14.5, 16.0, 18.0],          // 70
    [60.0, 42.0, 24.0, 18.0, 16.0, 15.0, 14.0, 16.0, 18.0],          // 75
    [56.0, 38.25, 23.0, 17.25, 15.81, 14.81, 14.0, 16.0, 18.0],      // 80
    [52.0, 34.5, 22.0, 16.5, 15.625, 14.625, 14.0, 16.0, 18.0],      // 85
    [48.0, 32.0, 21.0, 16.0, 15.5, 14.5, 14.0, 16.0, 18.0],          // 90
    [45.0, 28.0, 19.5, 15.5, 15.0, 14.0, 13.5, 16.0, 18.0],          // 95
    [42.0, 26.5, 18.5, 15.0, 14.5, 13.5, 13.0, 16.0, 18.0],          // 100
    [39.0, 25.0, 18.0, 14.5, 14.0, 13.0, 12.0, 16.0, 18.0],          // 105
    [36.0, 24.0, 18.0, 14.0, 13.0, 12.0, 11.0, 16.0, 18.0],          // 110
    [34.5, 22.5, 17.25, 12.5, 11.875, 11.25, 10.625, 14.5, 16.5],    // 115
    [33.0, 21.0, 16.5, 11.0, 10.75, 10.5, 10.25, 13.0, 15.0],        // 120
    [32.0, 20.0, 16.0, 10.0, 10.0, 10.0, 10.0, 12.0, 14.0],          // 125
];

/// Minimum font sizes for one APCA score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSizes {
    /// The Lc magnitude the sizes were looked up for.
    pub lc: f64,
    /// Sizes in px for [`FONT_WEIGHTS`], in the same order.
    pub sizes: [f64; 9],
}

impl FontSizes {
    /// Look up (and interpolate between rows) the sizes for `lc`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn for_lc(lc: f64) -> Self {
        let lc = if lc.is_nan() { 0.0 } else { lc.abs() };
        // Safe: lc is finite and non-negative, and the index is capped.
        let index = ((lc / 5.0).floor() as usize).min(FONT_TABLE.len() - 1);
        let row = FONT_TABLE[index];
        let next = FONT_TABLE.get(index + 1).unwrap_or(&row);
        let step = (lc - index as f64 * 5.0) / 5.0;

        let mut sizes = [0.0; 9];
        for (i, size) in sizes.iter_mut().enumerate() {
            let base = row[i];
            *size = if base > 400.0 {
                base
            } else if lc < 14.5 {
                FONT_PROHIBITED
            } else if lc < 29.5 {
                FONT_NON_TEXT
            } else {
                let delta = (base - next[i]) * step;
                if base > 24.0 {
                    (base - delta).round()
                } else {
                    base - (delta * 100.0).round() / 100.0
                }
            };
        }

        Self { lc, sizes }
    }

    /// Size for one weight (100..=900, rounded down to a hundred).
    #[must_use]
    pub fn for_weight(&self, weight: u16) -> f64 {
        let i = usize::from(weight.clamp(100, 900) / 100 - 1);
        self.sizes[i]
    }
}

// ── Contrast ─────────────────────────────────────────────────────────────────

/// A background and a text color to score against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    background: Rgb,
    text: Rgb,
}

impl Default for Contrast {
    /// White text on black.
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            text: Rgb::WHITE,
        }
    }
}

impl Contrast {
    /// Pair `background` (0–255 channels) with `text` given as hex.
    ///
    /// # Errors
    ///
    /// Fails when `text` is not a valid hex color.
    pub fn new(background: Rgb, text: &str) -> Result<Self> {
        let text = Rgba::from_hex(text)?.rgb;
        Ok(Self::from_colors(background, text))
    }

    #[must_use]
    pub fn from_colors(background: Rgb, text: Rgb) -> Self {
        Self {
            background: background.rounded(),
            text: text.rounded(),
        }
    }

    #[must_use]
    pub const fn background(&self) -> Rgb {
        self.background
    }

    #[must_use]
    pub const fn text(&self) -> Rgb {
        self.text
    }

    #[must_use]
    pub fn wcag_contrast(&self) -> f64 {
        contrast_ratio(self.background, self.text)
    }

    /// Magnitude of the APCA Lc score.
    #[must_use]
    pub fn apca_contrast(&self) -> f64 {
        apca_lc(self.text, self.background).abs()
    }

    #[must_use]
    pub fn wcag_score(&self) -> WcagScore {
        WcagScore::from_ratio(self.wcag_contrast())
    }

    #[must_use]
    pub fn recommended_usage(&self) -> Usage {
        Usage::from_lc(self.apca_contrast())
    }

    #[must_use]
    pub fn min_font_sizes(&self) -> FontSizes {
        FontSizes::for_lc(self.apca_contrast())
    }

    /// Badge color: pass for AA and AAA, fail for A.
    #[must_use]
    pub fn wcag_score_color(&self) -> Rgb {
        if self.wcag_score() == WcagScore::A {
            FAIL_COLOR
        } else {
            PASS_COLOR
        }
    }

    /// Badge color: fail only when the text should be avoided.
    #[must_use]
    pub fn apca_score_color(&self) -> Rgb {
        if self.recommended_usage() == Usage::Avoid {
            FAIL_COLOR
        } else {
            PASS_COLOR
        }
    }

    /// WCAG ratio of the text over a neutral (chroma 0) background at CIE
    /// lightness `lightness`.
    #[must_use]
    pub fn contrast_ratio_for_lightness(&self, lightness: f64) -> f64 {
        let bg = lch_to_rgb([lightness, 0.0, 0.0]).rounded();
        contrast_ratio(bg, self.text)
    }

    /// Bisect the neutral background lightness in [0, 100] that reaches
    /// `target` WCAG ratio against the text.
    ///
    /// Light text (luminance above 0.5) needs a darker background for more
    /// contrast, dark text a lighter one. The search stops once the bracket
    /// is narrower than `precision`; a non-positive precision uses
    /// [`DEFAULT_PRECISION`].
    #[must_use]
    pub fn lightness_for_contrast_ratio(&self, target: f64, precision: f64) -> f64 {
        let precision = if precision > 0.0 {
            precision
        } else {
            DEFAULT_PRECISION
        };
        let is_light_text = relative_luminance(self.text) > 0.5;

        let (mut min, mut max) = (0.0_f64, 100.0_f64);
        let mut current = if is_light_text { 20.0 } else { 80.0 };

        while max - min > precision {
            current = (min + max) / 2.0;
            let ratio = self.contrast_ratio_for_lightness(current);
            let too_low = ratio < target;
            // Light text: more contrast lives toward black.
            if too_low == is_light_text {
                max = current;
            } else {
                min = current;
            }
        }

        current
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
