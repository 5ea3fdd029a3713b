//! Session actions.
//!
//! [`Session`] owns the collaborators (services, compositor, upload and
//! export settings) and exposes one async method per user action. Each
//! action takes the caller's [`SessionState`] by `&mut` and updates it in
//! place, clearing results that no longer match the current image.

pub mod state;

pub use state::{DetectFlow, ReportFlow, SessionState, Tab, WatermarkFlow};

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{AppError, ValidationError};
use crate::export::{export_artifact, ExportConfig, ExportedArtifact};
use crate::services::{
    Ack, DetectionResult, DetectionService, ReportService, SimulatedDetectionService,
    SimulatedReportService,
};
use crate::upload::{load_upload_with_clear, UploadConfig, UploadFile};
use crate::watermark::{Compositor, WatermarkRequest, WatermarkResult};

pub struct Session {
    detection: Arc<dyn DetectionService>,
    reports: Arc<dyn ReportService>,
    compositor: Compositor,
    upload: UploadConfig,
    export: ExportConfig,
}

impl Session {
    pub fn new(
        detection: Arc<dyn DetectionService>,
        reports: Arc<dyn ReportService>,
        compositor: Compositor,
        upload: UploadConfig,
        export: ExportConfig,
    ) -> Self {
        Self {
            detection,
            reports,
            compositor,
            upload,
            export,
        }
    }

    /// Build a session backed by the simulated services.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        config.detection.validate().map_err(AppError::Config)?;
        let compositor = Compositor::new(config.watermark.clone())?;

        Ok(Self::new(
            Arc::new(SimulatedDetectionService::new(config.detection.clone())),
            Arc::new(SimulatedReportService::new(config.report.clone())),
            compositor,
            config.upload.clone(),
            config.export.clone(),
        ))
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Fresh state with the configured default watermark text.
    pub fn new_state(&self) -> SessionState {
        let mut state = SessionState::default();
        state.watermark.text = self.compositor.style().default_text.clone();
        state
    }

    pub fn select_tab(&self, state: &mut SessionState, tab: Tab) {
        tracing::debug!(from = ?state.active_tab, to = ?tab, "Tab selected");
        state.active_tab = tab;
    }

    /// Discard every image, result and form field.
    pub fn reset(&self, state: &mut SessionState) {
        *state = self.new_state();
        tracing::debug!("Session reset");
    }

    pub async fn upload_for_detection(
        &self,
        state: &mut SessionState,
        file: UploadFile,
    ) -> Result<(), AppError> {
        let flow = &mut state.detect;
        load_upload_with_clear(
            file,
            &self.upload,
            |handle| flow.image = Some(handle),
            || flow.result = None,
        )
        .await
    }

    pub async fn upload_for_watermark(
        &self,
        state: &mut SessionState,
        file: UploadFile,
    ) -> Result<(), AppError> {
        let flow = &mut state.watermark;
        load_upload_with_clear(
            file,
            &self.upload,
            |handle| flow.image = Some(handle),
            || flow.result = None,
        )
        .await
    }

    pub async fn upload_for_report(
        &self,
        state: &mut SessionState,
        file: UploadFile,
    ) -> Result<(), AppError> {
        let flow = &mut state.report;
        load_upload_with_clear(
            file,
            &self.upload,
            |handle| flow.form.image = Some(handle),
            || flow.ack = None,
        )
        .await
    }

    /// Analyze the detection image and store the verdict.
    pub async fn run_detection(&self, state: &mut SessionState) -> Result<DetectionResult, AppError> {
        let image = state
            .detect
            .image
            .clone()
            .ok_or(ValidationError::MissingField("image"))?;

        state.detect.analyzing = true;
        state.detect.result = None;
        let outcome = self.detection.analyze(&image).await;
        state.detect.analyzing = false;

        let result = outcome?;
        state.detect.result = Some(result.clone());
        Ok(result)
    }

    /// Stamp the current watermark text onto the watermark image.
    ///
    /// Returns `Ok(None)` without touching the state when the text is blank.
    pub async fn apply_watermark(
        &self,
        state: &mut SessionState,
    ) -> Result<Option<WatermarkResult>, AppError> {
        let image = state
            .watermark
            .image
            .clone()
            .ok_or(ValidationError::MissingField("image"))?;

        let Some(request) = WatermarkRequest::new(image, state.watermark.text.clone()) else {
            tracing::debug!("Watermark text is empty, nothing to apply");
            return Ok(None);
        };

        let start = Instant::now();
        state.watermark.processing = true;
        let outcome = self.compositor.compose(request).await;
        state.watermark.processing = false;

        let result = outcome.map_err(|e| {
            tracing::error!(error = %e, "Watermark failed");
            AppError::from(e)
        })?;

        tracing::info!(
            width = result.width(),
            height = result.height(),
            font_size = result.font_size(),
            bytes = result.data().len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Watermark applied"
        );

        state.watermark.result = Some(result.clone());
        Ok(Some(result))
    }

    /// Write the current watermarked image to the download directory.
    pub fn download_watermarked(&self, state: &SessionState) -> Result<ExportedArtifact, AppError> {
        let result = state
            .watermark
            .result
            .as_ref()
            .ok_or_else(|| AppError::Download("no watermarked image to download".to_string()))?;

        export_artifact(result, &self.export)
    }

    /// Validate the report form and submit it.
    ///
    /// On success the form is cleared and the receipt kept in the state.
    pub async fn submit_report(&self, state: &mut SessionState) -> Result<Ack, AppError> {
        let report = state.report.form.validate()?;

        state.report.submitting = true;
        let outcome = self.reports.submit(report).await;
        state.report.submitting = false;

        let ack = outcome?;
        state.report.form = Default::default();
        state.report.ack = Some(ack.clone());
        Ok(ack)
    }
}
