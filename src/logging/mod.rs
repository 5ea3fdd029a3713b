// Logging module for structured logging using the tracing crate

use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of log lines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable multi-line output
    Pretty,
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set (default: "info")
    #[serde(default = "default_level")]
    pub level: String,

    /// Log line format (default: json)
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid logging.level '{}': {}", self.level, e))
    }
}

/// Filter from `RUST_LOG`, falling back to the configured level.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, Box<dyn Error>> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.level)?),
    }
}

/// Initialize the tracing subscriber for structured logging
///
/// Log lines go to stderr so that command output on stdout stays
/// machine-readable.
///
/// # Errors
///
/// Returns an error if the level directive is invalid or a global
/// subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use veriframe::logging::{init_subscriber, LoggingConfig};
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let filter = build_filter(config)?;

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .with(filter)
            .try_init()?,
    }

    Ok(())
}
