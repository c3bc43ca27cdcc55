//! Runtime configuration, sourced from the process environment.

use std::env;
use std::time::Duration;

use crate::error::{AnalysisError, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the analysis service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenCage geocoding API key, required
    pub opencage_api_key: String,
    /// TCP port for the HTTP server
    pub port: u16,
    /// Timeout applied to every outbound provider call
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// The geocoding API key is the one required secret; a missing key is a
    /// fatal startup condition rather than a per-request failure.
    pub fn from_env() -> Result<Self> {
        let opencage_api_key = env::var("OPENCAGE_API_KEY")
            .map_err(|_| AnalysisError::Config("OPENCAGE_API_KEY is not set".to_string()))?;
        if opencage_api_key.trim().is_empty() {
            return Err(AnalysisError::Config("OPENCAGE_API_KEY is empty".to_string()));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AnalysisError::Config(format!("Invalid PORT value: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AnalysisError::Config(format!("Invalid REQUEST_TIMEOUT_SECS value: {raw}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            opencage_api_key,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
