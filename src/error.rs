//! Error types for the crate's outer boundary
//!
//! The simulation itself never fails; only score delivery and settings
//! storage can.

use thiserror::Error;

/// Failure handing a score report to the host
#[derive(Debug, Error)]
pub enum ReportError {
    /// The page did not install a score sink
    #[error("no score reporting host is available")]
    NoHost,

    /// The host refused or failed to store the report
    #[error("score report rejected: {0}")]
    Rejected(String),

    #[error("failed to encode score report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings storage unavailable: {0}")]
    Storage(String),
}
