//! Watermark style configuration.
//!
//! All constants of the text overlay live here so they can be tuned from the
//! `watermark:` section of the config file. The defaults reproduce the
//! standard overlay: bold text sized `max(W/10, 30)`, white at 70% opacity,
//! black drop shadow at 80% opacity with blur 10 and offset (2, 2).
//!
//! ```yaml
//! watermark:
//!   default_text: "© VeriFrame — Protected Content"
//!   fill_color: "#FFFFFF"
//!   fill_opacity: 0.7
//!   shadow_blur: 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::text_renderer::parse_hex_color;
use super::WatermarkError;

/// Placeholder text offered before the user types anything.
pub const DEFAULT_WATERMARK_TEXT: &str = "© VeriFrame — Protected Content";

// Default values
fn default_text() -> String {
    DEFAULT_WATERMARK_TEXT.to_string()
}

fn default_font_scale_divisor() -> f32 {
    10.0
}

fn default_min_font_size() -> f32 {
    30.0
}

fn default_fill_color() -> String {
    "#FFFFFF".to_string()
}

fn default_fill_opacity() -> f32 {
    0.7
}

fn default_shadow_color() -> String {
    "#000000".to_string()
}

fn default_shadow_opacity() -> f32 {
    0.8
}

fn default_shadow_blur() -> f32 {
    10.0
}

fn default_shadow_offset() -> i32 {
    2
}

/// Style of the centered text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkStyle {
    /// Text pre-filled in the watermark input
    #[serde(default = "default_text")]
    pub default_text: String,

    /// Font size is `image_width / font_scale_divisor` (default: 10)
    #[serde(default = "default_font_scale_divisor")]
    pub font_scale_divisor: f32,

    /// Lower bound for the font size in pixels (default: 30)
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f32,

    /// Text fill color as hex string (default: "#FFFFFF")
    #[serde(default = "default_fill_color")]
    pub fill_color: String,

    /// Fill opacity from 0.0 to 1.0 (default: 0.7)
    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f32,

    /// Drop shadow color as hex string (default: "#000000")
    #[serde(default = "default_shadow_color")]
    pub shadow_color: String,

    /// Drop shadow opacity from 0.0 to 1.0 (default: 0.8)
    #[serde(default = "default_shadow_opacity")]
    pub shadow_opacity: f32,

    /// Shadow blur radius; the Gaussian sigma is half of it (default: 10)
    #[serde(default = "default_shadow_blur")]
    pub shadow_blur: f32,

    /// Horizontal shadow offset in pixels (default: 2)
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset_x: i32,

    /// Vertical shadow offset in pixels (default: 2)
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset_y: i32,

    /// TrueType/OpenType font to use instead of the embedded bold sans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            default_text: default_text(),
            font_scale_divisor: default_font_scale_divisor(),
            min_font_size: default_min_font_size(),
            fill_color: default_fill_color(),
            fill_opacity: default_fill_opacity(),
            shadow_color: default_shadow_color(),
            shadow_opacity: default_shadow_opacity(),
            shadow_blur: default_shadow_blur(),
            shadow_offset_x: default_shadow_offset(),
            shadow_offset_y: default_shadow_offset(),
            font_path: None,
        }
    }
}

impl WatermarkStyle {
    /// Font size for an image of the given width: `max(W / divisor, min)`.
    pub fn font_size_for(&self, image_width: u32) -> f32 {
        (image_width as f32 / self.font_scale_divisor).max(self.min_font_size)
    }

    /// Gaussian sigma equivalent to the configured blur radius.
    pub fn shadow_sigma(&self) -> f32 {
        self.shadow_blur / 2.0
    }

    pub fn validate(&self) -> Result<(), WatermarkError> {
        if !(self.font_scale_divisor > 0.0) {
            return Err(WatermarkError::ConfigError(format!(
                "font_scale_divisor must be > 0, got {}",
                self.font_scale_divisor
            )));
        }

        if !(self.min_font_size > 0.0) {
            return Err(WatermarkError::ConfigError(format!(
                "min_font_size must be > 0, got {}",
                self.min_font_size
            )));
        }

        for (name, value) in [
            ("fill_opacity", self.fill_opacity),
            ("shadow_opacity", self.shadow_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WatermarkError::ConfigError(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }

        if self.shadow_blur < 0.0 {
            return Err(WatermarkError::ConfigError(format!(
                "shadow_blur must not be negative, got {}",
                self.shadow_blur
            )));
        }

        parse_hex_color(&self.fill_color)
            .map_err(|e| WatermarkError::ConfigError(format!("fill_color: {}", e)))?;
        parse_hex_color(&self.shadow_color)
            .map_err(|e| WatermarkError::ConfigError(format!("shadow_color: {}", e)))?;

        Ok(())
    }
}
