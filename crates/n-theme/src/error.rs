//! Errors raised by the palette engine.
//!
//! Numeric work never fails. What can fail is picking something by name
//! (an unknown harmony) and taking in pixels: a buffer that does not match
//! its dimensions, or bytes that do not decode.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Harmony name not recognized.
    #[error("unknown harmony type: {0:?}")]
    UnknownHarmony(String),

    /// An encoded image was given but this build cannot decode images.
    #[error("image decoding requires the `decode` feature")]
    DecoderUnavailable,

    /// A pixel buffer whose length does not match its dimensions.
    #[error("pixel buffer holds {actual} bytes, a {width}x{height} RGBA image needs width * height * 4")]
    BufferSize { width: u32, height: u32, actual: usize },

    /// The image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Invalid color text or selector.
    #[error(transparent)]
    Color(#[from] n_color::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
