//! Upload validation.
//!
//! A file is accepted when its declared content type starts with `image/`
//! and it is at most `max_bytes` long (5 MiB by default). Validation only
//! looks at the declared metadata; decoding happens afterwards.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ValidationError;

/// Largest accepted upload: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Declared content types must start with this prefix.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

fn default_max_bytes() -> usize {
    MAX_UPLOAD_BYTES
}

/// Upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes (default: 5242880)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

/// A user-selected file: name, declared content type and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, declaring its content type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, content_type_for_path(path), data))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Content type a browser would declare for a file with this extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Reject anything that is not declared as `image/*`.
pub fn validate_content_type(content_type: &str) -> Result<(), ValidationError> {
    let normalized = content_type.trim().to_ascii_lowercase();
    if normalized.starts_with(IMAGE_CONTENT_TYPE_PREFIX) {
        Ok(())
    } else {
        Err(ValidationError::InvalidType {
            content_type: content_type.to_string(),
        })
    }
}

/// Reject files larger than the configured maximum.
pub fn validate_size(size: usize, config: &UploadConfig) -> Result<(), ValidationError> {
    if size > config.max_bytes {
        return Err(ValidationError::TooLarge {
            size,
            max_size: config.max_bytes,
        });
    }
    Ok(())
}

/// Validate type first, then size.
pub fn validate_upload(file: &UploadFile, config: &UploadConfig) -> Result<(), ValidationError> {
    validate_content_type(&file.content_type)?;
    validate_size(file.size(), config)
}
