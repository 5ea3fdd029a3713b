//! Deepfake detection service.
//!
//! There is no detection model here. [`SimulatedDetectionService`] is a stand-in
//! that waits a moment and then returns a random verdict: "manipulated" with
//! probability 0.3 and a confidence drawn uniformly from 70..=99. Its output
//! carries no information about the image.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ServiceError;
use crate::upload::ImageHandle;

const MANIPULATED_DETAILS: &str = "Potential manipulation detected. Inconsistencies found in \
facial landmarks, lighting and texture patterns that are typical of synthetic imagery.";

const AUTHENTIC_DETAILS: &str = "No signs of manipulation detected. Lighting, texture and \
facial features appear consistent with an authentic photograph.";

fn default_delay_ms() -> u64 {
    2000
}

fn default_manipulated_probability() -> f64 {
    0.3
}

fn default_confidence_min() -> u8 {
    70
}

fn default_confidence_max() -> u8 {
    99
}

/// Settings of the mock detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Simulated analysis time in milliseconds (default: 2000)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Chance of a "manipulated" verdict (default: 0.3)
    #[serde(default = "default_manipulated_probability")]
    pub manipulated_probability: f64,

    /// Lowest reported confidence, inclusive (default: 70)
    #[serde(default = "default_confidence_min")]
    pub confidence_min: u8,

    /// Highest reported confidence, inclusive (default: 99)
    #[serde(default = "default_confidence_max")]
    pub confidence_max: u8,

    /// Fixed RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            manipulated_probability: default_manipulated_probability(),
            confidence_min: default_confidence_min(),
            confidence_max: default_confidence_max(),
            seed: None,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.manipulated_probability) {
            return Err(format!(
                "detection.manipulated_probability must be between 0.0 and 1.0, got {}",
                self.manipulated_probability
            ));
        }
        if self.confidence_min > self.confidence_max || self.confidence_max > 100 {
            return Err(format!(
                "detection confidence range {}..={} is invalid",
                self.confidence_min, self.confidence_max
            ));
        }
        Ok(())
    }
}

/// Verdict returned by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub is_manipulated: bool,
    /// Confidence in percent.
    pub confidence: u8,
    pub details: String,
}

/// Analyzes an image for signs of manipulation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetectionService: Send + Sync {
    async fn analyze(&self, image: &ImageHandle) -> Result<DetectionResult, ServiceError>;
}

/// Random stand-in for a detection backend.
pub struct SimulatedDetectionService {
    config: DetectionConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedDetectionService {
    pub fn new(config: DetectionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Draw a verdict without the simulated delay.
    pub fn draw(&self) -> DetectionResult {
        let mut rng = self.rng.lock();
        let is_manipulated = rng.gen_bool(self.config.manipulated_probability);
        let confidence = rng.gen_range(self.config.confidence_min..=self.config.confidence_max);

        DetectionResult {
            is_manipulated,
            confidence,
            details: if is_manipulated {
                MANIPULATED_DETAILS
            } else {
                AUTHENTIC_DETAILS
            }
            .to_string(),
        }
    }
}

impl Default for SimulatedDetectionService {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

#[async_trait]
impl DetectionService for SimulatedDetectionService {
    async fn analyze(&self, image: &ImageHandle) -> Result<DetectionResult, ServiceError> {
        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }

        let result = self.draw();

        tracing::info!(
            image = %image.fingerprint(),
            is_manipulated = result.is_manipulated,
            confidence = result.confidence,
            "Mock detection completed"
        );

        Ok(result)
    }
}
