//! Text watermarking for uploaded images.
//!
//! The compositor takes a decoded image and a non-empty string, draws the
//! string once at the center of a copy of the image (semi-transparent fill,
//! blurred drop shadow), and returns the copy as PNG bytes.
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   fill_opacity: 0.7
//!   shadow_opacity: 0.8
//!   shadow_blur: 10
//!   min_font_size: 30
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod position;
pub mod text_renderer;

pub use compositor::{
    Compositor, LayerStack, WatermarkLayer, WatermarkRequest, WatermarkResult,
    OUTPUT_CONTENT_TYPE,
};
pub use config::{WatermarkStyle, DEFAULT_WATERMARK_TEXT};
pub use error::WatermarkError;
pub use position::{
    centered_position, ImageDimensions, LayerDimensions, LayerRect, PlacementPosition,
};
pub use text_renderer::{
    embedded_font, load_font, measure_text, parse_hex_color, render_text_clipped, Color,
    TextLayer, TextMetrics, TextRenderOptions,
};
