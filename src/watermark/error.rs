//! Watermark error types.
//!
//! Defines errors that can occur while compositing a text watermark.

use std::fmt;

/// Errors that can occur during watermark processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkError {
    /// Source image could not be decoded, or the drawing surface could not be acquired
    DecodeError(String),

    /// Failed to load the font or render the text
    RenderError(String),

    /// Invalid style configuration
    ConfigError(String),

    /// Failed to serialize the output surface
    EncodeError(String),

    /// The text renders no covered pixels (for example only zero-width characters)
    NoVisibleText,
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeError(msg) => write!(f, "Failed to decode source image: {}", msg),
            Self::RenderError(msg) => write!(f, "Failed to render text watermark: {}", msg),
            Self::ConfigError(msg) => write!(f, "Watermark configuration error: {}", msg),
            Self::EncodeError(msg) => write!(f, "Failed to encode watermarked image: {}", msg),
            Self::NoVisibleText => write!(f, "Watermark text has no visible characters"),
        }
    }
}

impl std::error::Error for WatermarkError {}
