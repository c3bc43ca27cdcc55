//! HTTP handlers for the dashboard API.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::analysis::{AnalyzeParams, AnalyzeService};
use crate::error::AnalysisError;
use crate::geocode::{LocationResolver, SUGGESTION_LIMIT};
use crate::models::{AnalysisResult, GeocodeSuggestion};

/// Shared, immutable service handles. No mutable state crosses requests.
pub struct AppState {
    pub analyze: AnalyzeService,
    pub autocomplete: LocationResolver,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/autocomplete-location", post(autocomplete_location))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub location_name: Option<String>,
    /// Year values arrive as strings from the dashboard form
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteRequest {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<GeocodeSuggestion>,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    let params = match AnalyzeParams::parse(
        request.location_name,
        request.start_year,
        request.end_year,
    ) {
        Ok(params) => params,
        Err(err) => return analyze_error(&err),
    };

    match state.analyze.analyze(&params).await {
        Ok(analysis) => Json(AnalyzeResponse { analysis }).into_response(),
        Err(err) => {
            error!("Analyze request failed: {}", err);
            analyze_error(&err)
        }
    }
}

async fn autocomplete_location(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutocompleteRequest>,
) -> Response {
    let query = request.query.unwrap_or_default();

    match state.autocomplete.resolve(&query, SUGGESTION_LIMIT).await {
        // Zero matches is a successful empty list, not an error.
        Ok(suggestions) => Json(AutocompleteResponse { suggestions }).into_response(),
        Err(err) => {
            error!("Autocomplete request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string(), "suggestions": [] })),
            )
                .into_response()
        }
    }
}

fn analyze_error(err: &AnalysisError) -> Response {
    let status = match err {
        AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnalysisError::LocationNotFound => StatusCode::NOT_FOUND,
        AnalysisError::ClimateDataUnavailable
        | AnalysisError::Upstream(_)
        | AnalysisError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
