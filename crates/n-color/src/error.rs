// SPDX-License-Identifier: MIT
//
// Errors for the few n-color operations that can fail: parsing text
// (hex strings, enumerated selectors) into typed values. The numeric
// conversions themselves are total and never return an error.

use thiserror::Error;

/// Errors raised when text cannot be turned into a color or a selector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Not a `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` string.
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    /// Unrecognized color-space key.
    #[error("unknown color space: {0:?} (expected LCH, OKLCH, LAB, OKLAB, HSL or HSLUV)")]
    UnknownColorSpace(String),

    /// Unrecognized vision simulation mode.
    #[error("unknown vision simulation mode: {0:?}")]
    UnknownVisionMode(String),

    /// Unrecognized chroma-curve version.
    #[error("unknown algorithm version: {0:?} (expected v1, v2 or v3)")]
    UnknownAlgorithmVersion(String),
}

/// Result alias for n-color.
pub type Result<T> = std::result::Result<T, Error>;
