// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::export::ExportConfig;
use crate::logging::LoggingConfig;
use crate::services::{DetectionConfig, ReportConfig};
use crate::upload::UploadConfig;
use crate::watermark::WatermarkStyle;

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub watermark: WatermarkStyle,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        if substituted.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.upload.max_bytes == 0 {
            return Err("upload.max_bytes must be greater than 0".to_string());
        }

        self.watermark.validate().map_err(|e| e.to_string())?;
        self.detection.validate()?;

        if self.export.filename_prefix.trim().is_empty() {
            return Err("export.filename_prefix cannot be empty".to_string());
        }
        if self
            .export
            .filename_prefix
            .contains(|c: char| c == '/' || c == '\\')
        {
            return Err(format!(
                "export.filename_prefix '{}' must not contain path separators",
                self.export.filename_prefix
            ));
        }

        self.logging.validate()?;

        Ok(())
    }
}
