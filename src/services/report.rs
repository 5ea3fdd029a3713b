//! Deepfake report submission.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use uuid::Uuid;

use super::ServiceError;
use crate::error::ValidationError;
use crate::upload::ImageHandle;

fn default_delay_ms() -> u64 {
    1500
}

/// Settings of the mock report backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Simulated submission time in milliseconds (default: 1500)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Loose `local@domain.tld` check.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().map_or(false, |re| re.is_match(email))
}

/// Form fields as entered, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub email: String,
    pub description: String,
    pub image: Option<ImageHandle>,
}

impl ReportForm {
    /// Check the fields and build a submittable [`Report`].
    ///
    /// Fields are checked in form order: image, email, description.
    pub fn validate(&self) -> Result<Report, ValidationError> {
        let image = self
            .image
            .clone()
            .ok_or(ValidationError::MissingField("image"))?;

        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingField("description"));
        }

        Ok(Report {
            email: email.to_string(),
            description: description.to_string(),
            image,
        })
    }
}

/// A validated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub email: String,
    pub description: String,
    pub image: ImageHandle,
}

/// Receipt for a submitted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub report_id: Uuid,
    pub received_at: DateTime<Utc>,
}

/// Accepts deepfake reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportService: Send + Sync {
    async fn submit(&self, report: Report) -> Result<Ack, ServiceError>;
}

/// In-memory stand-in for a report backend.
///
/// Reports are kept in submission order and never leave the process.
#[derive(Default)]
pub struct SimulatedReportService {
    config: ReportConfig,
    submitted: Mutex<Vec<(Ack, Report)>>,
}

impl SimulatedReportService {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().len()
    }

    pub fn submissions(&self) -> Vec<(Ack, Report)> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl ReportService for SimulatedReportService {
    async fn submit(&self, report: Report) -> Result<Ack, ServiceError> {
        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }

        let ack = Ack {
            report_id: Uuid::new_v4(),
            received_at: Utc::now(),
        };

        tracing::info!(
            report_id = %ack.report_id,
            email = %report.email,
            description_len = report.description.len(),
            image = %report.image.fingerprint(),
            "Report recorded"
        );

        self.submitted.lock().push((ack.clone(), report));
        Ok(ack)
    }
}
