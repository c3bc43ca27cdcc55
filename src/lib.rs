//! Backend for the climate and deforestation analysis dashboard.
//!
//! Resolves free-text place names via the OpenCage geocoder, reduces
//! Open-Meteo daily archive observations to annual climate summaries,
//! synthesizes a placeholder deforestation series, and serves the
//! combined analysis over a small JSON API.

pub mod analysis;
pub mod api;
pub mod climate;
pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod synthetic;
pub mod web;

pub use analysis::{AnalyzeParams, AnalyzeService};
pub use climate::{ClimateAggregator, ClimateArchive, OpenMeteoArchive};
pub use config::AppConfig;
pub use error::{AnalysisError, Result};
pub use geocode::{GeocodeProvider, LocationResolver, OpenCageClient};
pub use models::{
    AnalysisResult, AnnualClimateRecord, AnnualDeforestationRecord, GeocodeResult,
    GeocodeSuggestion,
};
