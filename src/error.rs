// Error types module

use crate::services::ServiceError;
use crate::watermark::WatermarkError;
use thiserror::Error;

/// Input rejected before any work is done.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported content type '{content_type}': expected image/*")]
    InvalidType { content_type: String },

    #[error("File size {size} bytes exceeds maximum {max_size} bytes")]
    TooLarge { size: usize, max_size: usize },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),
}

/// Centralized error type for the engine
///
/// Every variant is handled where it happens and surfaced to the user as an
/// alert; nothing is retried.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad file type/size or incomplete form; aborts the action
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Surface or image decode failure; no partial state is kept
    #[error("Decode error: {0}")]
    Decode(String),

    /// Artifact export failure
    #[error("Download error: {0}")]
    Download(String),

    /// Detection or report backend failure
    #[error("Service error: {0}")]
    Service(String),

    /// Invalid configuration file or values
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short machine-friendly name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Decode(_) => "decode",
            AppError::Download(_) => "download",
            AppError::Service(_) => "service",
            AppError::Config(_) => "config",
        }
    }

    /// Text shown to the user in an alert.
    pub fn alert_message(&self) -> String {
        match self {
            AppError::Validation(ValidationError::InvalidType { .. }) => {
                "Please upload an image file".to_string()
            }
            AppError::Validation(ValidationError::TooLarge { max_size, .. }) => format!(
                "File size must be less than {}MB",
                max_size / (1024 * 1024)
            ),
            AppError::Validation(ValidationError::MissingField(field)) => {
                format!("Please provide the {}", field)
            }
            AppError::Validation(ValidationError::InvalidEmail(_)) => {
                "Please enter a valid email address".to_string()
            }
            AppError::Decode(_) => "Error processing image. Please try again.".to_string(),
            AppError::Download(_) => "Failed to download image. Please try again.".to_string(),
            AppError::Service(_) => "The request could not be completed. Please try again.".to_string(),
            AppError::Config(msg) => format!("Invalid configuration: {}", msg),
        }
    }
}

impl From<WatermarkError> for AppError {
    fn from(err: WatermarkError) -> Self {
        match err {
            WatermarkError::ConfigError(msg) => AppError::Config(msg),
            WatermarkError::NoVisibleText => {
                AppError::Validation(ValidationError::MissingField("watermark text"))
            }
            other => AppError::Decode(other.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err.to_string())
    }
}
