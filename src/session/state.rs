//! Per-session UI state.

use serde::{Deserialize, Serialize};

use crate::services::{Ack, DetectionResult, ReportForm};
use crate::upload::ImageHandle;
use crate::watermark::{WatermarkResult, DEFAULT_WATERMARK_TEXT};

/// The three flows offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Detect,
    Watermark,
    Report,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectFlow {
    pub image: Option<ImageHandle>,
    pub result: Option<DetectionResult>,
    pub analyzing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkFlow {
    pub image: Option<ImageHandle>,
    /// Text to stamp; starts out as [`DEFAULT_WATERMARK_TEXT`].
    pub text: String,
    /// Last composed image. A newer composition simply overwrites it.
    pub result: Option<WatermarkResult>,
    pub processing: bool,
}

impl Default for WatermarkFlow {
    fn default() -> Self {
        Self {
            image: None,
            text: DEFAULT_WATERMARK_TEXT.to_string(),
            result: None,
            processing: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFlow {
    pub form: ReportForm,
    pub submitting: bool,
    /// Receipt of the last successful submission.
    pub ack: Option<Ack>,
}

/// Everything a UI needs to render one session.
///
/// Owned by the caller and passed into each action as `&mut`; there is no
/// shared or global copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub active_tab: Tab,
    pub detect: DetectFlow,
    pub watermark: WatermarkFlow,
    pub report: ReportFlow,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any flow is waiting on a backend or the compositor.
    pub fn is_busy(&self) -> bool {
        self.detect.analyzing || self.watermark.processing || self.report.submitting
    }
}
