//! Backend service seams.
//!
//! Detection and report submission are reached only through the
//! [`DetectionService`] and [`ReportService`] traits. The shipped
//! implementations are stubs: detection is a random draw and submission
//! records the report in memory. A real backend replaces them without any
//! change to session handling.

pub mod detection;
pub mod report;

pub use detection::{DetectionConfig, DetectionResult, DetectionService, SimulatedDetectionService};
pub use report::{Ack, SimulatedReportService, Report, ReportConfig, ReportForm, ReportService};

use thiserror::Error;

/// Errors reported by a service backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}
