//! # n-theme: palette engine
//!
//! Turns a handful of designer-chosen source colors into a complete,
//! multi-theme palette, and provides the color tools that sit around it.
//!
//! # Architecture
//!
//! ```text
//! PaletteConfig (colors + themes + space + algorithm + lock)
//!     │
//!     ▼
//! palette.rs:  theme × color × stop expansion through n_color::ColorTransform
//!     │        nearest-to-source detection and pinning
//!     ▼
//! Palette tree (themes → colors → shades, every representation)
//!
//! contrast.rs: WCAG ratio, APCA Lc, font sizes, lightness solver
//! harmony.rs:  hue rotations around a base color
//! dominant.rs: k-means++ over RGBA pixels
//! ```
//!
//! Numeric work never fails. Errors come only from parsing names and
//! decoding images.

// Hue/lightness/chroma variable names are inherently similar.
#![allow(clippy::similar_names)]

pub mod config;
pub mod contrast;
pub mod dominant;
pub mod error;
pub mod harmony;
pub mod palette;

pub use config::{PaletteConfig, Scale, SourceColor, Theme, ThemeKind, UnitRgb};
pub use contrast::{Contrast, FontSizes, Usage, WcagScore};
pub use dominant::{DecodedImage, DominantColor, DominantColors, ExtractOptions};
pub use error::{Error, Result};
pub use harmony::{ColorHarmony, HarmonyKind, HarmonyResult};
pub use palette::{LibraryEntry, Palette, PaletteBuilder, PaletteShade};
