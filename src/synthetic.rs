//! Synthetic deforestation series.
//!
//! Real deforestation measurements are not wired up; the dashboard renders
//! a placeholder series with a plausible shape instead. The baseline leans
//! on a crude latitude heuristic (tropical deforestation concentrates near
//! the equator) and each year adds a worsening trend plus uniform noise.

use rand::RngExt;
use tracing::debug;

use crate::models::AnnualDeforestationRecord;

/// Annual hectares lost at year zero, outside the tropics.
const TEMPERATE_BASELINE: f64 = 500.0;
/// Annual hectares lost at year zero, within 30 degrees of the equator.
const TROPICAL_BASELINE: f64 = 1500.0;
/// Added per year of the queried span.
const TREND_PER_YEAR: f64 = 50.0;
/// Uniform noise half-width.
const NOISE: f64 = 150.0;

/// Generate one record per year in `[start_year, end_year]` inclusive,
/// drawing fresh randomness per call. Repeated runs over the same range
/// will not reproduce identical figures.
pub fn generate(
    latitude: f64,
    start_year: i32,
    end_year: i32,
) -> Vec<AnnualDeforestationRecord> {
    generate_with(&mut rand::rng(), latitude, start_year, end_year)
}

/// Same as [`generate`], with an injectable random source for tests.
pub fn generate_with<R: RngExt + ?Sized>(
    rng: &mut R,
    latitude: f64,
    start_year: i32,
    end_year: i32,
) -> Vec<AnnualDeforestationRecord> {
    let baseline = if latitude.abs() > 30.0 {
        TEMPERATE_BASELINE
    } else {
        TROPICAL_BASELINE
    };
    debug!(
        "Generating deforestation series, baseline {} for latitude {:.4}",
        baseline, latitude
    );

    (start_year..=end_year)
        .map(|year| {
            let trend = f64::from(year - start_year) * TREND_PER_YEAR;
            let noise = rng.random_range(-NOISE..NOISE);
            AnnualDeforestationRecord {
                year,
                hectares_lost: (baseline + trend + noise).max(0.0).round(),
            }
        })
        .collect()
}
