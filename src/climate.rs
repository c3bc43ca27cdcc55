//! Historical climate retrieval and annual aggregation.
//!
//! Daily observations come from the Open-Meteo archive API as parallel
//! arrays (one date string array, one nullable numeric array per field).
//! They are bucketed by calendar year and reduced to one summary record
//! per year that has usable data.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{AnalysisError, Result};
use crate::models::AnnualClimateRecord;

/// External archive-weather provider.
#[async_trait]
pub trait ClimateArchive: Send + Sync {
    /// Fetch daily mean temperature and precipitation sums for the
    /// inclusive date range, in the location's local time zone.
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: &str,
        end_date: &str,
    ) -> Result<openmeteo::ArchiveResponse>;
}

/// HTTP client for the Open-Meteo archive endpoint. No API key required.
pub struct OpenMeteoArchive {
    http: reqwest::Client,
}

impl OpenMeteoArchive {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("canopy-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ClimateArchive for OpenMeteoArchive {
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: &str,
        end_date: &str,
    ) -> Result<openmeteo::ArchiveResponse> {
        let url = format!(
            "https://archive-api.open-meteo.com/v1/archive?latitude={latitude}&longitude={longitude}&start_date={start_date}&end_date={end_date}&daily=temperature_2m_mean,precipitation_sum&timezone=auto"
        );

        debug!("Open-Meteo archive request: {}", url);
        let response: openmeteo::ArchiveResponse =
            self.http.get(url).send().await?.json().await?;
        Ok(response)
    }
}

/// Reduces raw daily observations to annual climate summaries.
pub struct ClimateAggregator {
    archive: Box<dyn ClimateArchive>,
}

impl ClimateAggregator {
    pub fn new(archive: Box<dyn ClimateArchive>) -> Self {
        Self { archive }
    }

    /// Fetch and aggregate one record per year in `[start_year, end_year]`
    /// that has at least one valid temperature reading. Years without any
    /// are omitted, so the result can be sparser than the requested span.
    pub async fn aggregate(
        &self,
        latitude: f64,
        longitude: f64,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<AnnualClimateRecord>> {
        let start_date = format!("{start_year}-01-01");
        let end_date = format!("{end_year}-12-31");

        info!(
            "Fetching climate data for ({:.4}, {:.4}), {} to {}",
            latitude, longitude, start_date, end_date
        );
        let response = self
            .archive
            .fetch_daily(latitude, longitude, &start_date, &end_date)
            .await?;

        let Some(daily) = response.daily else {
            return Err(AnalysisError::ClimateDataUnavailable);
        };

        let series = aggregate_years(&daily, start_year, end_year);
        info!(
            "Aggregated {} daily observations into {} annual records",
            daily.time.len(),
            series.len()
        );
        Ok(series)
    }
}

/// Bucket daily observations by calendar year and reduce each bucket.
///
/// A null temperature or precipitation reading is skipped for that field
/// only; the two fields can be missing on independent days. Rounding is
/// half-away-from-zero, applied once per year after aggregation.
pub fn aggregate_years(
    daily: &openmeteo::DailySeries,
    start_year: i32,
    end_year: i32,
) -> Vec<AnnualClimateRecord> {
    let mut buckets: BTreeMap<i32, YearBucket> = BTreeMap::new();

    for (i, date_str) in daily.time.iter().enumerate() {
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            debug!("Skipping unparseable date '{}'", date_str);
            continue;
        };
        let bucket = buckets.entry(date.year()).or_default();

        if let Some(temp) = reading_at(daily.temperature_2m_mean.as_deref(), i) {
            bucket.temps.push(temp);
        }
        if let Some(precip) = reading_at(daily.precipitation_sum.as_deref(), i) {
            bucket.precips.push(precip);
        }
    }

    let mut series = Vec::new();
    for year in start_year..=end_year {
        let Some(bucket) = buckets.get(&year) else {
            continue;
        };
        // A year with no valid temperatures is omitted, never zero-filled.
        if bucket.temps.is_empty() {
            continue;
        }

        let avg_temp = bucket.temps.iter().sum::<f64>() / bucket.temps.len() as f64;
        let total_precip = bucket.precips.iter().sum::<f64>();
        series.push(AnnualClimateRecord {
            year,
            avg_temp_c: (avg_temp * 10.0).round() / 10.0,
            total_precip_mm: total_precip.round(),
        });
    }

    series
}

#[derive(Default)]
struct YearBucket {
    temps: Vec<f64>,
    precips: Vec<f64>,
}

fn reading_at(values: Option<&[Option<f64>]>, index: usize) -> Option<f64> {
    values.and_then(|v| v.get(index).copied()).flatten()
}

/// Open-Meteo archive API response structures
pub mod openmeteo {
    use serde::Deserialize;

    /// Archive response; `daily` is absent when the location/range has no data.
    #[derive(Debug, Clone, Deserialize)]
    pub struct ArchiveResponse {
        pub daily: Option<DailySeries>,
    }

    /// Parallel daily arrays, nullable per index.
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct DailySeries {
        pub time: Vec<String>,
        pub temperature_2m_mean: Option<Vec<Option<f64>>>,
        pub precipitation_sum: Option<Vec<Option<f64>>>,
    }
}
