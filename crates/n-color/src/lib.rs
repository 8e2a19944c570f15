// SPDX-License-Identifier: MIT
//
// n-color: color science engine for n-palette.
//
// Converts sRGB source colors into the spaces palette shades are generated
// in (CIE LCH/LAB, OKLCH/OKLAB, HSL, HSLuv), applies the hue and chroma
// adjustments a scale stop asks for, simulates color-vision deficiencies
// and composites translucent colors over a background.
//
// Channels travel as `f64` on the 0–255 scale. No operation on numbers
// fails; only parsing text (hex strings, enum keys) returns `Result`.

// Hue/lightness/chroma variable names are inherently similar.
#![allow(clippy::similar_names)]
// Matrix literals carry more digits than f64 keeps.
#![allow(clippy::excessive_precision, clippy::unreadable_literal)]

pub mod error;
pub mod rgb;
pub mod space;
pub mod transform;
pub mod vision;

pub use error::{Error, Result};
pub use rgb::{Rgb, Rgba};
pub use space::ColorSpace;
pub use transform::{AlgorithmVersion, ColorTransform};
pub use vision::VisionMode;
