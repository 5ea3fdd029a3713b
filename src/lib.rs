// VeriFrame library
// Watermark compositor, upload validation and the simulated detection/report services

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod services;
pub mod session;
pub mod upload;
pub mod watermark;
