//! Placement math for the centered text overlay.
//!
//! A rendered text layer carries transparent padding around the glyphs (room
//! for the shadow blur). Placement works on the *content box* inside that
//! padding so the text itself, not the padded layer, is centered.
//!
//! # Example
//!
//! ```ignore
//! use veriframe::watermark::position::{centered_position, ImageDimensions, LayerDimensions};
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let text = LayerDimensions { width: 100, height: 50 };
//!
//! let pos = centered_position(&image, &text);
//! assert_eq!((pos.x, pos.y), (350, 275));
//! ```

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of a layer (or of its content box) to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner where a layer should be placed. May be negative when the
/// layer is larger than the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift the position by the given offset.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rectangle in layer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl LayerRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Overlap of two rectangles, `None` when they do not touch.
    pub fn intersect(&self, other: &LayerRect) -> Option<LayerRect> {
        let left = i64::from(self.x).max(i64::from(other.x));
        let top = i64::from(self.y).max(i64::from(other.y));
        let right = (i64::from(self.x) + i64::from(self.width))
            .min(i64::from(other.x) + i64::from(other.width));
        let bottom = (i64::from(self.y) + i64::from(self.height))
            .min(i64::from(other.y) + i64::from(other.height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(LayerRect::new(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

/// Part of a layer placed at `pos` that can reach the image, in layer
/// coordinates, grown by `margin` pixels on every side.
pub fn visible_window(pos: &PlacementPosition, image: &ImageDimensions, margin: u32) -> LayerRect {
    let margin = margin.min(i32::MAX as u32 / 4) as i32;
    LayerRect::new(
        margin.saturating_add(pos.x).saturating_neg(),
        margin.saturating_add(pos.y).saturating_neg(),
        image.width.saturating_add(margin as u32 * 2),
        image.height.saturating_add(margin as u32 * 2),
    )
}

/// Center point of the image, `(W/2, H/2)`.
pub fn center_point(image: &ImageDimensions) -> (f32, f32) {
    (image.width as f32 / 2.0, image.height as f32 / 2.0)
}

/// Top-left position that centers `content` on the image's center point.
///
/// Both axes are anchored at the middle, so the content box is centered
/// regardless of how long the text is.
pub fn centered_position(image: &ImageDimensions, content: &LayerDimensions) -> PlacementPosition {
    let (cx, cy) = center_point(image);
    let x = (cx - content.width as f32 / 2.0).round() as i32;
    let y = (cy - content.height as f32 / 2.0).round() as i32;
    PlacementPosition::new(x, y)
}

/// Position of a padded layer such that its content box lands centered.
///
/// `padding` is the transparent margin on every side of the content box.
pub fn centered_layer_position(
    image: &ImageDimensions,
    content: &LayerDimensions,
    padding: u32,
) -> PlacementPosition {
    let pad = padding as i32;
    centered_position(image, content).offset(-pad, -pad)
}

/// Check if a layer at `pos` is at least partially visible within the image.
pub fn is_visible(pos: &PlacementPosition, image: &ImageDimensions, layer: &LayerDimensions) -> bool {
    let right = pos.x + layer.width as i32;
    let bottom = pos.y + layer.height as i32;

    pos.x < image.width as i32 && pos.y < image.height as i32 && right > 0 && bottom > 0
}
