//! Data model for the analysis pipeline and its JSON wire format.

use serde::{Deserialize, Serialize};

/// Single best geocoding match for a free-text place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Canonical display name as formatted by the geocoder
    pub display_name: String,
}

/// One autocomplete candidate, in provider relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeSuggestion {
    pub name: String,
    /// `[latitude, longitude]` — the map view consumes this positionally
    pub coordinates: [f64; 2],
}

/// Annual climate summary for one calendar year.
///
/// Only years with at least one valid temperature reading are ever
/// materialized; a sparse series is the expected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualClimateRecord {
    pub year: i32,
    /// Mean of the year's daily mean temperatures, 1 decimal place
    pub avg_temp_c: f64,
    /// Sum of the year's daily precipitation, rounded to whole millimeters
    pub total_precip_mm: f64,
}

/// Synthetic annual deforestation figure. Always non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualDeforestationRecord {
    pub year: i32,
    pub hectares_lost: f64,
}

/// Combined analysis returned to the dashboard, assembled fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Canonical display name of the analyzed location
    pub location: String,
    /// Label of the form "2015-2020"
    pub time_range: String,
    /// `[latitude, longitude]` — Leaflet expects this exact order, do not swap
    pub coordinates: [f64; 2],
    /// Dense: one entry per requested year, ascending
    pub deforestation_series: Vec<AnnualDeforestationRecord>,
    /// Possibly sparse subsequence of the requested years, ascending
    pub climate_series: Vec<AnnualClimateRecord>,
}
