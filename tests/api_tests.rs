//! End-to-end tests for the JSON API, with both providers stubbed out.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use canopy_server::api::AppState;
use canopy_server::climate::openmeteo::{ArchiveResponse, DailySeries};
use canopy_server::{
    AnalyzeService, ClimateAggregator, ClimateArchive, GeocodeProvider, LocationResolver, Result,
    geocode::GeocodeMatch, web,
};

struct StubGeocoder {
    matches: Vec<GeocodeMatch>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl GeocodeProvider for StubGeocoder {
    async fn search(&self, _query: &str, limit: u8) -> Result<Vec<GeocodeMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.matches.iter().take(limit as usize).cloned().collect())
    }
}

struct StubArchive {
    daily: Option<DailySeries>,
}

#[async_trait]
impl ClimateArchive for StubArchive {
    async fn fetch_daily(
        &self,
        _latitude: f64,
        _longitude: f64,
        _start_date: &str,
        _end_date: &str,
    ) -> Result<ArchiveResponse> {
        Ok(ArchiveResponse {
            daily: self.daily.clone(),
        })
    }
}

fn manaus() -> GeocodeMatch {
    GeocodeMatch {
        formatted: "Manaus, Amazonas, Brazil".to_string(),
        latitude: -3.119,
        longitude: -60.0217,
    }
}

fn daily_for_2020() -> DailySeries {
    DailySeries {
        time: vec![
            "2020-01-01".to_string(),
            "2020-01-02".to_string(),
            "2020-01-03".to_string(),
        ],
        temperature_2m_mean: Some(vec![Some(26.0), Some(27.0), None]),
        precipitation_sum: Some(vec![Some(10.0), None, Some(5.0)]),
    }
}

fn test_app(matches: Vec<GeocodeMatch>, daily: Option<DailySeries>) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = Arc::new(AppState {
        analyze: AnalyzeService::new(
            LocationResolver::new(Box::new(StubGeocoder {
                matches: matches.clone(),
                calls: Arc::clone(&calls),
            })),
            ClimateAggregator::new(Box::new(StubArchive { daily })),
        ),
        autocomplete: LocationResolver::new(Box::new(StubGeocoder {
            matches,
            calls: Arc::clone(&calls),
        })),
    });
    (web::app(state), calls)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn analyze_returns_the_combined_analysis() {
    let (app, _) = test_app(vec![manaus()], Some(daily_for_2020()));

    let request = post_json(
        "/api/analyze",
        json!({ "locationName": "Manaus", "startYear": "2019", "endYear": "2021" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let analysis = &body["analysis"];
    assert_eq!(analysis["location"], "Manaus, Amazonas, Brazil");
    assert_eq!(analysis["time_range"], "2019-2021");
    assert_eq!(analysis["coordinates"], json!([-3.119, -60.0217]));

    let deforestation = analysis["deforestation_series"].as_array().unwrap();
    assert_eq!(deforestation.len(), 3);
    assert_eq!(deforestation[0]["year"], 2019);
    assert_eq!(deforestation[2]["year"], 2021);
    assert!(deforestation.iter().all(|r| r["hectares_lost"].as_f64().unwrap() >= 0.0));

    let climate = analysis["climate_series"].as_array().unwrap();
    assert_eq!(climate.len(), 1);
    assert_eq!(climate[0]["year"], 2020);
    assert_eq!(climate[0]["avg_temp_c"], 26.5);
    assert_eq!(climate[0]["total_precip_mm"], 15.0);
}

#[tokio::test]
async fn analyze_unknown_location_is_a_404() {
    let (app, _) = test_app(Vec::new(), Some(daily_for_2020()));

    let request = post_json(
        "/api/analyze",
        json!({ "locationName": "Nowhereland1234", "startYear": "2019", "endYear": "2021" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Location not found");
}

#[tokio::test]
async fn analyze_missing_fields_are_a_400() {
    let (app, _) = test_app(vec![manaus()], Some(daily_for_2020()));

    let request = post_json("/api/analyze", json!({ "locationName": "Manaus" }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("startYear"));
}

#[tokio::test]
async fn analyze_without_daily_series_reports_the_cause() {
    let (app, _) = test_app(vec![manaus()], None);

    let request = post_json(
        "/api/analyze",
        json!({ "locationName": "Manaus", "startYear": "2019", "endYear": "2021" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Climate data not available")
    );
}

#[tokio::test]
async fn autocomplete_returns_suggestions_in_order() {
    let second = GeocodeMatch {
        formatted: "Manaus, Iowa".to_string(),
        latitude: 41.0,
        longitude: -93.0,
    };
    let (app, _) = test_app(vec![manaus(), second], Some(daily_for_2020()));

    let request = post_json("/api/autocomplete-location", json!({ "query": "Manaus" }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["name"], "Manaus, Amazonas, Brazil");
    assert_eq!(suggestions[0]["coordinates"], json!([-3.119, -60.0217]));
}

#[tokio::test]
async fn autocomplete_short_query_is_empty_without_provider_calls() {
    let (app, calls) = test_app(vec![manaus()], Some(daily_for_2020()));

    let request = post_json("/api/autocomplete-location", json!({ "query": "a" }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["suggestions"], json!([]));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn autocomplete_no_matches_is_still_a_200() {
    let (app, _) = test_app(Vec::new(), Some(daily_for_2020()));

    let request = post_json("/api/autocomplete-location", json!({ "query": "zzzz" }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["suggestions"], json!([]));
}

#[tokio::test]
async fn preflight_is_allowed_from_any_origin() {
    let (app, _) = test_app(vec![manaus()], Some(daily_for_2020()));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/analyze")
        .header(header::ORIGIN, "https://dashboard.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}
