//! Error types for the analysis service

use thiserror::Error;

/// Failure taxonomy for the analysis pipeline.
///
/// Every variant is surfaced to the caller as a JSON error body; none of
/// them trigger an automatic retry.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Missing or malformed request fields
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Geocoding returned zero candidates
    #[error("Location not found")]
    LocationNotFound,

    /// Weather archive response lacked the expected daily series
    #[error("Climate data not available for this location and time range")]
    ClimateDataUnavailable,

    /// Transport failure or malformed body from an upstream provider
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
