//! Text rendering for the watermark overlay.
//!
//! Renders a text string into a transparent RGBA layer that the compositor
//! blends onto the output surface. The layer carries a transparent margin on
//! every side so a blurred drop shadow derived from it is not clipped.
//!
//! # Example
//!
//! ```ignore
//! use veriframe::watermark::position::LayerRect;
//! use veriframe::watermark::text_renderer::{embedded_font, render_text_clipped, TextRenderOptions};
//!
//! let font = embedded_font()?;
//! let options = TextRenderOptions {
//!     text: "Copyright 2025".to_string(),
//!     font_size: 40.0,
//!     ..Default::default()
//! };
//!
//! let window = LayerRect::new(0, 0, 800, 200);
//! let layer = render_text_clipped(&font, &options, 0, &window)?;
//! ```

use super::position::{LayerDimensions, LayerRect, PlacementPosition};
use super::WatermarkError;
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::sync::OnceLock;

/// Embedded bold sans-serif font (DejaVu Sans Bold, see fonts/LICENSE-DejaVu).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");

static EMBEDDED_FONT: OnceLock<FontArc> = OnceLock::new();

/// Get the embedded bold font, parsing it on first use.
pub fn embedded_font() -> Result<FontArc, WatermarkError> {
    if let Some(font) = EMBEDDED_FONT.get() {
        return Ok(font.clone());
    }

    let font = FontArc::try_from_slice(EMBEDDED_FONT_DATA)
        .map_err(|e| WatermarkError::RenderError(format!("embedded font: {}", e)))?;

    Ok(EMBEDDED_FONT.get_or_init(|| font).clone())
}

/// Load a font from disk, or fall back to the embedded font when `path` is `None`.
pub fn load_font(path: Option<&Path>) -> Result<FontArc, WatermarkError> {
    let Some(path) = path else {
        return embedded_font();
    };

    let data = std::fs::read(path).map_err(|e| {
        WatermarkError::RenderError(format!("cannot read font {}: {}", path.display(), e))
    })?;

    FontArc::try_from_vec(data).map_err(|e| {
        WatermarkError::RenderError(format!("invalid font {}: {}", path.display(), e))
    })
}

/// RGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// This color with the given alpha.
    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color (RGB).
    pub color: Color,
    /// Opacity (0.0 to 1.0).
    pub opacity: f32,
}

impl Default for TextRenderOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 30.0,
            color: Color::white(),
            opacity: 0.7,
        }
    }
}

/// Size of a laid-out text line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Sum of glyph advances and kerning, in pixels.
    pub width: f32,
    /// Ascent minus descent, in pixels.
    pub height: f32,
    /// Distance from the top of the text box to the baseline.
    pub ascent: f32,
}

impl TextMetrics {
    /// The text box rounded up to whole pixels (at least 1×1).
    pub fn content_box(&self) -> LayerDimensions {
        LayerDimensions {
            width: (self.width.ceil() as u32).max(1),
            height: (self.height.ceil() as u32).max(1),
        }
    }
}

/// A rendered text layer.
///
/// `image` may cover only part of the padded layer; `origin` locates it.
#[derive(Debug, Clone)]
pub struct TextLayer {
    /// Transparent RGBA image holding the glyphs.
    pub image: RgbaImage,
    /// Top-left of `image` within the padded layer.
    pub origin: PlacementPosition,
    /// Transparent margin around the text box on every side.
    pub padding: u32,
    /// Size of the text box inside the padding.
    pub content: LayerDimensions,
}

/// Parse a hex color string into RGB components.
///
/// Supports both `#RGB` and `#RRGGBB`.
///
/// ```ignore
/// assert_eq!(parse_hex_color("#FFF").unwrap(), Color::new(255, 255, 255));
/// assert_eq!(parse_hex_color("#FF0000").unwrap(), Color::new(255, 0, 0));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::RenderError("Color must start with '#'".to_string()))?;

    if !digits.is_ascii() {
        return Err(WatermarkError::RenderError(format!(
            "Invalid hex digit in '{}'",
            hex
        )));
    }

    let component = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| WatermarkError::RenderError(format!("Invalid hex digit in '{}'", hex)))
    };

    match digits.len() {
        // Each digit is doubled: 0xF -> 0xFF, 0xA -> 0xAA
        3 => Ok(Color::new(
            component(&digits[0..1])? * 17,
            component(&digits[1..2])? * 17,
            component(&digits[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            component(&digits[0..2])?,
            component(&digits[2..4])?,
            component(&digits[4..6])?,
        )),
        n => Err(WatermarkError::RenderError(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            n
        ))),
    }
}

/// Measure a single line of text.
pub fn measure_text(font: &FontArc, text: &str, font_size: f32) -> TextMetrics {
    let scaled_font = font.as_scaled(PxScale::from(font_size));

    let mut width = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }
        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    TextMetrics {
        width,
        height: scaled_font.height(),
        ascent: scaled_font.ascent(),
    }
}

/// Render text into a transparent layer with `padding` pixels of margin,
/// keeping only the part that falls inside `window` (layer coordinates).
///
/// Glyphs outside the window are neither outlined nor rasterized, so the cost
/// is bounded by the window rather than by the length of the text.
///
/// Fails on empty text (callers gate the overlay on non-empty input) and with
/// [`WatermarkError::NoVisibleText`] when nothing inside the window is inked.
pub fn render_text_clipped(
    font: &FontArc,
    options: &TextRenderOptions,
    padding: u32,
    window: &LayerRect,
) -> Result<TextLayer, WatermarkError> {
    if options.text.is_empty() {
        return Err(WatermarkError::RenderError(
            "Cannot render empty text".to_string(),
        ));
    }

    if !(options.font_size > 0.0) {
        return Err(WatermarkError::RenderError(format!(
            "Font size must be positive, got {}",
            options.font_size
        )));
    }

    let scale = PxScale::from(options.font_size);
    let scaled_font = font.as_scaled(scale);
    let metrics = measure_text(font, &options.text, options.font_size);
    let content = metrics.content_box();

    let full = LayerRect::new(
        0,
        0,
        content.width.saturating_add(padding.saturating_mul(2)),
        content.height.saturating_add(padding.saturating_mul(2)),
    );
    let clip = full.intersect(window).ok_or(WatermarkError::NoVisibleText)?;
    let (clip_width, clip_height) = (clip.width as i64, clip.height as i64);

    // Coverage of the whole string, so glyph edges that touch do not stack
    let mut coverage_map = vec![0.0f32; clip.width as usize * clip.height as usize];
    let baseline_y = padding as f32 + metrics.ascent;
    let mut cursor_x = padding as f32;
    let mut prev_glyph: Option<GlyphId> = None;

    // Outlines may overhang their advance; one em covers it
    let left = clip.x as f32 - options.font_size;
    let right = clip.x as f32 + clip.width as f32 + options.font_size;

    for c in options.text.chars() {
        if cursor_x > right {
            break;
        }

        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }
        let advance = scaled_font.h_advance(glyph_id);

        if cursor_x + advance >= left {
            let glyph =
                glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();

                outlined.draw(|px, py, coverage| {
                    let x = px as i64 + bounds.min.x as i64 - clip.x as i64;
                    let y = py as i64 + bounds.min.y as i64 - clip.y as i64;

                    if x >= 0 && y >= 0 && x < clip_width && y < clip_height {
                        let idx = (y * clip_width + x) as usize;
                        coverage_map[idx] = (coverage_map[idx] + coverage).min(1.0);
                    }
                });
            }
        }

        cursor_x += advance;
        prev_glyph = Some(glyph_id);
    }

    if coverage_map.iter().all(|&coverage| coverage <= 0.0) {
        return Err(WatermarkError::NoVisibleText);
    }

    let alpha = options.opacity.clamp(0.0, 1.0) * 255.0;
    let image = RgbaImage::from_fn(clip.width, clip.height, |x, y| {
        let coverage = coverage_map[(y * clip.width + x) as usize];
        options.color.with_alpha((coverage * alpha).round() as u8)
    });

    Ok(TextLayer {
        image,
        origin: PlacementPosition::new(clip.x, clip.y),
        padding,
        content,
    })
}
