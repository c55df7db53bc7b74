//! Error types for verdict-report

use thiserror::Error;

/// Errors raised while loading or validating a build report.
///
/// Every variant is an input error: it is detected before any network call.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report document could not be parsed
    #[error("Malformed build report: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Coverage outside [0, 100] or not a finite number
    #[error("Test coverage must be a number in [0, 100], got {0}")]
    CoverageOutOfRange(f64),

    /// A required field is present but empty
    #[error("Build report field is empty: {0}")]
    EmptyField(&'static str),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
