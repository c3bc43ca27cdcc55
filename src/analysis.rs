//! Orchestration of the analysis pipeline.
//!
//! One pass per request: resolve the location, synthesize the deforestation
//! series from the resolved latitude, aggregate the climate series from the
//! resolved coordinates, assemble the result. A failure at any step fails
//! the whole request; the two series are never delivered independently.

use tracing::info;

use crate::climate::ClimateAggregator;
use crate::error::{AnalysisError, Result};
use crate::geocode::LocationResolver;
use crate::models::AnalysisResult;
use crate::synthetic;

/// Validated analyze request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeParams {
    pub location_name: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl AnalyzeParams {
    /// Validate raw request fields. Year values arrive as strings on the
    /// wire; both must parse and form a non-empty ascending range.
    pub fn parse(
        location_name: Option<String>,
        start_year: Option<String>,
        end_year: Option<String>,
    ) -> Result<Self> {
        let location_name = location_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AnalysisError::InvalidInput("locationName is required".to_string()))?;
        let start_year = parse_year(start_year, "startYear")?;
        let end_year = parse_year(end_year, "endYear")?;

        if start_year > end_year {
            return Err(AnalysisError::InvalidInput(format!(
                "startYear {start_year} is after endYear {end_year}"
            )));
        }

        Ok(Self {
            location_name,
            start_year,
            end_year,
        })
    }
}

fn parse_year(value: Option<String>, field: &str) -> Result<i32> {
    let raw = value.ok_or_else(|| AnalysisError::InvalidInput(format!("{field} is required")))?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AnalysisError::InvalidInput(format!("{field} is not a valid year: {raw}")))
}

/// Combines the location resolver, climate aggregator, and synthetic
/// generator into the full analysis.
pub struct AnalyzeService {
    resolver: LocationResolver,
    climate: ClimateAggregator,
}

impl AnalyzeService {
    pub fn new(resolver: LocationResolver, climate: ClimateAggregator) -> Self {
        Self { resolver, climate }
    }

    pub async fn analyze(&self, params: &AnalyzeParams) -> Result<AnalysisResult> {
        info!(
            "Analyzing {} from {} to {}",
            params.location_name, params.start_year, params.end_year
        );

        let place = self.resolver.resolve_one(&params.location_name).await?;

        let deforestation_series =
            synthetic::generate(place.latitude, params.start_year, params.end_year);

        let climate_series = self
            .climate
            .aggregate(
                place.latitude,
                place.longitude,
                params.start_year,
                params.end_year,
            )
            .await?;

        info!("Analysis complete for {}", place.display_name);
        Ok(AnalysisResult {
            location: place.display_name,
            time_range: format!("{}-{}", params.start_year, params.end_year),
            coordinates: [place.latitude, place.longitude],
            deforestation_series,
            climate_series,
        })
    }
}
