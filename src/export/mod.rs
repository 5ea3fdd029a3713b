//! Artifact export.
//!
//! The watermarked PNG is handed out either as a `data:` URI or written to a
//! download directory as `watermarked-<unix-epoch-millis>.png`.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::AppError;
use crate::watermark::WatermarkResult;

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_filename_prefix() -> String {
    "watermarked".to_string()
}

/// Where downloads land and how they are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving downloaded artifacts (default: ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix (default: "watermarked")
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            filename_prefix: default_filename_prefix(),
        }
    }
}

/// A file written by [`export_artifact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: usize,
}

/// Encode bytes as `data:<content_type>;base64,<payload>`.
pub fn data_uri(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(data))
}

/// `<prefix>-<unix-epoch-millis>.png`
pub fn download_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.png", prefix, at.timestamp_millis())
}

/// Write the artifact into the download directory.
///
/// Any I/O failure is a [`AppError::Download`]; nothing is retried.
pub fn export_artifact(
    result: &WatermarkResult,
    config: &ExportConfig,
) -> Result<ExportedArtifact, AppError> {
    export_artifact_at(result, config, Utc::now())
}

/// [`export_artifact`] with an explicit timestamp for the file name.
pub fn export_artifact_at(
    result: &WatermarkResult,
    config: &ExportConfig,
    at: DateTime<Utc>,
) -> Result<ExportedArtifact, AppError> {
    let file_name = download_file_name(&config.filename_prefix, at);
    let path = config.output_dir.join(&file_name);

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        AppError::Download(format!(
            "cannot create {}: {}",
            config.output_dir.display(),
            e
        ))
    })?;

    std::fs::write(&path, result.data())
        .map_err(|e| AppError::Download(format!("cannot write {}: {}", path.display(), e)))?;

    tracing::info!(
        path = %path.display(),
        bytes = result.data().len(),
        width = result.width(),
        height = result.height(),
        "Watermarked image exported"
    );

    Ok(ExportedArtifact {
        path,
        file_name,
        bytes: result.data().len(),
    })
}
