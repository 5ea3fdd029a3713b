//! Watermark compositor.
//!
//! Copies the decoded source onto a fresh output surface, draws the text once
//! at the center with a blurred drop shadow underneath, and encodes the
//! surface as PNG. The source handle is never touched; every call produces a
//! new artifact.
//!
//! # Example
//!
//! ```ignore
//! use veriframe::watermark::{Compositor, WatermarkRequest, WatermarkStyle};
//!
//! let compositor = Compositor::new(WatermarkStyle::default())?;
//! if let Some(request) = WatermarkRequest::new(handle, "TEST") {
//!     let result = compositor.compose(request).await?;
//!     assert_eq!((result.width(), result.height()), (400, 300));
//! }
//! ```

use super::position::{
    centered_layer_position, is_visible, visible_window, ImageDimensions, LayerDimensions,
    PlacementPosition,
};
use super::text_renderer::{
    load_font, measure_text, parse_hex_color, render_text_clipped, Color, TextRenderOptions,
};
use super::{WatermarkError, WatermarkStyle};
use crate::export::data_uri;
use crate::upload::ImageHandle;
use ab_glyph::FontArc;
use bytes::Bytes;
use image::{Rgba, RgbaImage};
use std::sync::Arc;
use std::time::Instant;

/// MIME type of every compositor output.
pub const OUTPUT_CONTENT_TYPE: &str = "image/png";

/// A request to watermark one image with one text string.
#[derive(Debug, Clone)]
pub struct WatermarkRequest {
    source: ImageHandle,
    text: String,
}

impl WatermarkRequest {
    /// Build a request, or `None` when the text is blank.
    ///
    /// A blank text means the overlay is disabled: there is nothing to draw
    /// and no artifact should be produced.
    pub fn new(source: ImageHandle, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self { source, text })
    }

    pub fn source(&self) -> &ImageHandle {
        &self.source
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The encoded output of a compositing run.
#[derive(Clone, PartialEq)]
pub struct WatermarkResult {
    data: Bytes,
    width: u32,
    height: u32,
    font_size: f32,
}

impl WatermarkResult {
    /// PNG-encoded bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Font size (in pixels) the text was drawn at.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn content_type(&self) -> &'static str {
        OUTPUT_CONTENT_TYPE
    }

    /// `data:image/png;base64,...` form of the artifact.
    pub fn data_uri(&self) -> String {
        data_uri(OUTPUT_CONTENT_TYPE, &self.data)
    }
}

impl std::fmt::Debug for WatermarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkResult")
            .field("dimensions", &(self.width, self.height))
            .field("bytes", &self.data.len())
            .field("font_size", &self.font_size)
            .finish()
    }
}

/// An RGBA layer to be blended onto a surface.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The layer image (RGBA).
    pub image: RgbaImage,
    /// Where the layer's top-left corner lands on the surface.
    pub position: PlacementPosition,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .finish()
    }
}

/// Ordered stack of layers; later layers are drawn on top.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: Vec<WatermarkLayer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer: WatermarkLayer) {
        self.layers.push(layer);
    }

    /// Blend all layers onto the target, in insertion order.
    ///
    /// Layers lying entirely off the target are skipped.
    pub fn apply(&self, target: &mut RgbaImage) {
        let dims = ImageDimensions {
            width: target.width(),
            height: target.height(),
        };

        for layer in &self.layers {
            let size = LayerDimensions {
                width: layer.image.width(),
                height: layer.image.height(),
            };
            if is_visible(&layer.position, &dims, &size) {
                blend_layer(target, layer);
            }
        }
    }
}

/// Renders the centered text overlay according to a [`WatermarkStyle`].
///
/// Cheap to clone: the style and font are shared.
#[derive(Clone)]
pub struct Compositor {
    style: Arc<WatermarkStyle>,
    font: FontArc,
    fill: Color,
    shadow: Color,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Validate the style and load its font.
    pub fn new(style: WatermarkStyle) -> Result<Self, WatermarkError> {
        style.validate()?;
        let font = load_font(style.font_path.as_deref())?;
        let fill = parse_hex_color(&style.fill_color)?;
        let shadow = parse_hex_color(&style.shadow_color)?;

        Ok(Self {
            style: Arc::new(style),
            font,
            fill,
            shadow,
        })
    }

    pub fn style(&self) -> &WatermarkStyle {
        &self.style
    }

    /// Font size used for an image of the given width.
    pub fn font_size_for(&self, image_width: u32) -> f32 {
        self.style.font_size_for(image_width)
    }

    /// Decode, overlay and encode on the blocking pool.
    ///
    /// The only suspension point is waiting for that work to finish; a task
    /// that fails to complete surfaces as [`WatermarkError::DecodeError`].
    pub async fn compose(&self, request: WatermarkRequest) -> Result<WatermarkResult, WatermarkError> {
        let compositor = self.clone();
        tokio::task::spawn_blocking(move || compositor.compose_blocking(&request))
            .await
            .map_err(|e| WatermarkError::DecodeError(format!("compositing task failed: {}", e)))?
    }

    /// Synchronous compositing: decode → copy → overlay → encode.
    pub fn compose_blocking(
        &self,
        request: &WatermarkRequest,
    ) -> Result<WatermarkResult, WatermarkError> {
        let started = Instant::now();
        let source = request.source();

        let decoded = source.decode().map_err(WatermarkError::DecodeError)?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(WatermarkError::DecodeError(format!(
                "cannot acquire a {}x{} drawing surface",
                width, height
            )));
        }

        // Fresh W×H surface holding an unchanged copy of the source pixels
        let mut surface = RgbaImage::new(width, height);
        image::imageops::replace(&mut surface, &decoded.to_rgba8(), 0, 0);

        let font_size = self.draw_text(&mut surface, request.text())?;
        let data = encode_png(&surface)?;

        tracing::debug!(
            source = %source.fingerprint(),
            width = width,
            height = height,
            font_size = font_size,
            output_bytes = data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Watermark composited"
        );

        Ok(WatermarkResult {
            data: Bytes::from(data),
            width,
            height,
            font_size,
        })
    }

    /// Draw `text` centered on `surface` with its drop shadow.
    ///
    /// Returns the font size used.
    pub fn draw_text(&self, surface: &mut RgbaImage, text: &str) -> Result<f32, WatermarkError> {
        let dims = ImageDimensions {
            width: surface.width(),
            height: surface.height(),
        };
        let font_size = self.font_size_for(dims.width);

        let sigma = self.style.shadow_sigma();
        let padding = (sigma * 3.0).ceil() as u32;

        let metrics = measure_text(&self.font, text, font_size);
        let layer_position = centered_layer_position(&dims, &metrics.content_box(), padding);

        // Only the part of the layer that can reach the surface is rendered:
        // the surface grown by the blur margin and the shadow offset.
        let reach = self
            .style
            .shadow_offset_x
            .unsigned_abs()
            .max(self.style.shadow_offset_y.unsigned_abs());
        let window = visible_window(&layer_position, &dims, padding.saturating_add(reach));

        let text_layer = render_text_clipped(
            &self.font,
            &TextRenderOptions {
                text: text.to_string(),
                font_size,
                color: self.fill,
                opacity: self.style.fill_opacity,
            },
            padding,
            &window,
        )?;

        let position = layer_position.offset(text_layer.origin.x, text_layer.origin.y);
        let shadow = shadow_image(&text_layer.image, self.shadow, self.style.shadow_opacity, sigma);

        let mut stack = LayerStack::new();
        stack.add_layer(WatermarkLayer {
            image: shadow,
            position: position.offset(self.style.shadow_offset_x, self.style.shadow_offset_y),
        });
        stack.add_layer(WatermarkLayer {
            image: text_layer.image,
            position,
        });
        stack.apply(surface);

        Ok(font_size)
    }
}

/// Build the drop shadow of a rendered text layer.
///
/// The shadow inherits the text's alpha (fill opacity included) scaled by the
/// shadow opacity, then gets a Gaussian blur.
fn shadow_image(text: &RgbaImage, color: Color, opacity: f32, sigma: f32) -> RgbaImage {
    let opacity = opacity.clamp(0.0, 1.0);
    let shadow = RgbaImage::from_fn(text.width(), text.height(), |x, y| {
        let alpha = text.get_pixel(x, y)[3] as f32 * opacity;
        color.with_alpha(alpha.round() as u8)
    });

    if sigma > 0.0 {
        image::imageops::blur(&shadow, sigma)
    } else {
        shadow
    }
}

fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, WatermarkError> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder as _;
    use std::io::Cursor;

    let mut output = Cursor::new(Vec::new());
    PngEncoder::new(&mut output)
        .write_image(
            surface.as_raw(),
            surface.width(),
            surface.height(),
            image::ColorType::Rgba8,
        )
        .map_err(|e| WatermarkError::EncodeError(e.to_string()))?;

    Ok(output.into_inner())
}

/// Blend a single layer onto the target image, clipped to its bounds.
fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    let target_width = target.width() as i32;
    let target_height = target.height() as i32;

    let x_start = layer.position.x.max(0);
    let y_start = layer.position.y.max(0);
    let x_end = (layer.position.x + layer.image.width() as i32).min(target_width);
    let y_end = (layer.position.y + layer.image.height() as i32).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let lx = (tx - layer.position.x) as u32;
            let ly = (ty - layer.position.y) as u32;

            let layer_pixel = layer.image.get_pixel(lx, ly);
            if layer_pixel[3] == 0 {
                continue;
            }

            let target_pixel = target.get_pixel(tx as u32, ty as u32);
            let blended = blend_pixels(*target_pixel, *layer_pixel);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Blend two pixels using alpha compositing.
///
/// Porter-Duff "over": result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
