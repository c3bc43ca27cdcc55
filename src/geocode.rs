//! Location resolution via the OpenCage geocoding API.
//!
//! Free-text place names are resolved either to a single best-match
//! coordinate pair (for analysis) or to a short candidate list (for
//! autocomplete). Every call goes straight to the provider; there is
//! deliberately no caching layer in front of it.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{GeocodeResult, GeocodeSuggestion};

/// Candidate limit used by the autocomplete endpoint.
pub const SUGGESTION_LIMIT: u8 = 5;

/// Queries shorter than this (trimmed) never reach the provider.
const MIN_QUERY_LEN: usize = 2;

/// One raw match from a geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub formatted: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// External geocoding provider, requested with an explicit candidate limit.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<GeocodeMatch>>;
}

/// HTTP client for the OpenCage forward-geocoding endpoint.
pub struct OpenCageClient {
    http: reqwest::Client,
    api_key: String,
}

impl OpenCageClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("canopy-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: config.opencage_api_key.clone(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for OpenCageClient {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<GeocodeMatch>> {
        // Annotation payloads (timezone, currency, ...) are dead weight here.
        let url = format!(
            "https://api.opencagedata.com/geocode/v1/json?q={}&key={}&limit={}&no_annotations=1",
            urlencoding::encode(query),
            self.api_key,
            limit
        );

        debug!("Geocoding '{}' (limit {})", query, limit);
        let response: opencage::GeocodeResponse =
            self.http.get(url).send().await?.json().await?;

        let matches: Vec<GeocodeMatch> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|result| GeocodeMatch {
                formatted: result.formatted,
                latitude: result.geometry.lat,
                longitude: result.geometry.lng,
            })
            .collect();

        if matches.is_empty() {
            warn!("No geocoding results for '{}'", query);
        } else {
            info!("Found {} geocoding results for '{}'", matches.len(), query);
        }

        Ok(matches)
    }
}

/// Resolves free-text location input through a [`GeocodeProvider`].
pub struct LocationResolver {
    provider: Box<dyn GeocodeProvider>,
}

impl LocationResolver {
    pub fn new(provider: Box<dyn GeocodeProvider>) -> Self {
        Self { provider }
    }

    /// Return up to `limit` suggestions in provider relevance order.
    ///
    /// A trimmed query shorter than two characters yields an empty list
    /// without issuing any provider call.
    pub async fn resolve(&self, query: &str, limit: u8) -> Result<Vec<GeocodeSuggestion>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            debug!("Query too short, skipping geocoder");
            return Ok(Vec::new());
        }

        let matches = self.provider.search(query, limit).await?;
        Ok(matches
            .into_iter()
            .map(|m| GeocodeSuggestion {
                name: m.formatted,
                coordinates: [m.latitude, m.longitude],
            })
            .collect())
    }

    /// Resolve to the single best match, or `LocationNotFound`.
    pub async fn resolve_one(&self, query: &str) -> Result<GeocodeResult> {
        let mut suggestions = self.resolve(query, 1).await?;
        if suggestions.is_empty() {
            return Err(AnalysisError::LocationNotFound);
        }
        let best = suggestions.remove(0);

        info!(
            "Geocoded '{}' to {} ({:.4}, {:.4})",
            query, best.name, best.coordinates[0], best.coordinates[1]
        );
        Ok(GeocodeResult {
            latitude: best.coordinates[0],
            longitude: best.coordinates[1],
            display_name: best.name,
        })
    }
}

/// OpenCage API response structures
mod opencage {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        pub results: Option<Vec<GeocodeEntry>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeEntry {
        pub formatted: String,
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub lat: f64,
        pub lng: f64,
    }
}
