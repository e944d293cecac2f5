//! HTTP API surface: router and request handlers.

use crate::compare;
use crate::dataset::Dataset;
use crate::error::HydroscopeError;
use crate::metrics;
use crate::models::{
    AiQueryRequest, Comparison, CompareRequest, LocationsRequest, Record, ReportRequest,
};
use crate::narrative::NarrativeSource;
use crate::report;
use crate::validated_json::ValidatedJson;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Process-wide read-only state shared by all handlers.
pub struct AppState {
    /// The water quality dataset, loaded once at startup
    pub dataset: Dataset,
    /// Client for the external narrative service
    pub narrative: Arc<dyn NarrativeSource>,
}

/// Build the API router.
///
/// # Arguments
///
/// * `state`: Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/data", get(data))
        .route("/api/unique_states", get(unique_states))
        .route("/api/locations_in_state", post(locations_in_state))
        .route("/api/compare", post(compare_locations))
        .route("/api/ai_query", post(ai_query))
        .route("/api/generate_report", post(generate_report))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/healthz", get(healthz))
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .on_request(metrics::request_counter)
                    .on_response(metrics::record_response_metrics),
            ),
        )
        .with_state(state)
}

/// Liveness probe.
async fn healthz() -> &'static str {
    "OK"
}

/// `GET /api/data`: the full record set.
async fn data(State(state): State<Arc<AppState>>) -> Json<Vec<Record>> {
    Json(state.dataset.records().to_vec())
}

/// `GET /api/unique_states`: distinct state values.
async fn unique_states(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.dataset.unique_states())
}

/// `POST /api/locations_in_state`: distinct locations for one state.
async fn locations_in_state(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LocationsRequest>,
) -> Json<Vec<String>> {
    Json(state.dataset.locations_in(&request.state))
}

/// `POST /api/compare`: compare two locations on a parameter.
///
/// Field presence is enforced by the extractor; the comparison itself cannot
/// fail.
async fn compare_locations(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CompareRequest>,
) -> Json<Comparison> {
    Json(compare::compare(&state.dataset, &request))
}

/// `POST /api/ai_query`: proxy one free-text prompt to the narrative service
/// and return its raw response.
async fn ai_query(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AiQueryRequest>,
) -> Result<Json<serde_json::Value>, HydroscopeError> {
    let response = state.narrative.query(&request.query).await?;
    Ok(Json(response))
}

/// `POST /api/generate_report`: build a PDF report for the supplied records.
async fn generate_report(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ReportRequest>,
) -> Result<Response, HydroscopeError> {
    let pdf = report::generate_report(state.narrative.as_ref(), &request.data).await?;
    Ok((
        [
            (
                &header::CONTENT_TYPE,
                mime::APPLICATION_PDF.to_string(),
            ),
            (
                &header::CONTENT_DISPOSITION,
                "attachment; filename=\"water_quality_report.pdf\"".to_string(),
            ),
        ],
        pdf,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{self, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot` and `ready`

    const CSV: &str = "\
STATION_CODE,STATE,LOCATIONS,TEMP,DO,pH,CONDUCTIVITY,BOD,NITRATE_N_NITRITE_N,FECAL_COLIFORM,TOTAL_COLIFORM
1,S,X,25.0,6.0,7.0,300,3.0,0.5,100,400
2,S,X,26.0,6.5,7.2,310,5.0,0.6,120,420
3,S,Y,25.5,5.0,7.1,305,4.0,0.5,110,410
4,S,Y,25.5,5.5,7.3,315,4.0,0.7,130,430
5,T,Z,24.0,7.0,7.5,280,1.5,0.3,60,200
";

    /// Narrative stub: canned generate text, canned raw query body, or a
    /// failure when `fail` is set.
    struct StubNarrative {
        fail: bool,
    }

    #[async_trait]
    impl NarrativeSource for StubNarrative {
        async fn query(&self, prompt: &str) -> Result<Value, HydroscopeError> {
            if self.fail {
                return Err(HydroscopeError::UpstreamStatus {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(json!({"echo": prompt}))
        }

        async fn generate(&self, _prompt: &str) -> Result<String, HydroscopeError> {
            if self.fail {
                return Err(HydroscopeError::UpstreamEmpty);
            }
            Ok("Reason\nCAUSES\nCause\nCONSEQUENCES\nBad\nSOLUTIONS\nFix".to_string())
        }
    }

    fn test_router(fail_upstream: bool) -> Router {
        let state = Arc::new(AppState {
            dataset: Dataset::from_reader(CSV.as_bytes()).unwrap(),
            narrative: Arc::new(StubNarrative {
                fail: fail_upstream,
            }),
        });
        router(state)
    }

    async fn get_request(uri: &str) -> axum::response::Response {
        test_router(false)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_request(uri: &str, body: Value, fail_upstream: bool) -> axum::response::Response {
        test_router(fail_upstream)
            .oneshot(
                Request::builder()
                    .method(http::Method::POST)
                    .uri(uri)
                    .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn data_returns_all_records() {
        let response = get_request("/api/data").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[0]["LOCATIONS"], "X");
    }

    #[tokio::test]
    async fn unique_states_distinct_in_order() {
        let response = get_request("/api/unique_states").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["S", "T"]));
    }

    #[tokio::test]
    async fn locations_in_state() {
        let response = post_request("/api/locations_in_state", json!({"state": "S"}), false).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["X", "Y"]));
    }

    #[tokio::test]
    async fn locations_in_unknown_state_is_empty() {
        let response =
            post_request("/api/locations_in_state", json!({"state": "NOPE"}), false).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn compare_happy_path() {
        let body = json!({
            "location1": "X",
            "location2": "Y",
            "parameter": "DO",
            "secondary_parameter": "pH"
        });
        let response = post_request("/api/compare", body, false).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["more_polluted"], "X");
        assert_eq!(json["location1_data"].as_array().unwrap().len(), 2);
        assert!(json["reason"].as_str().unwrap().contains("higher DO levels"));
        assert!(!json["solution"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn compare_missing_required_field_is_client_error() {
        let body = json!({"location1": "X", "parameter": "DO"});
        let response = post_request("/api/compare", body, false).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn compare_empty_location_is_client_error() {
        let body = json!({"location1": "", "location2": "Y", "parameter": "DO"});
        let response = post_request("/api/compare", body, false).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn compare_unknown_location_returns_empty_rowset() {
        let body = json!({"location1": "X", "location2": "NOWHERE", "parameter": "DO"});
        let response = post_request("/api/compare", body, false).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["location2_data"], json!([]));
        assert!(json["location2_mean"].is_null());
    }

    #[tokio::test]
    async fn ai_query_proxies_upstream_response() {
        let response = post_request("/api/ai_query", json!({"query": "hello"}), false).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"echo": "hello"}));
    }

    #[tokio::test]
    async fn ai_query_forwards_upstream_status() {
        let response = post_request("/api/ai_query", json!({"query": "hello"}), true).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("status 503"));
    }

    #[tokio::test]
    async fn generate_report_returns_pdf_attachment() {
        let record = json!({"STATION_CODE": "1", "STATE": "S", "LOCATIONS": "X", "pH": 7.0});
        let response =
            post_request("/api/generate_report", json!({"data": [record]}), false).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "application/pdf"
        );
        assert!(response.headers()[http::header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment"));
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn generate_report_empty_data_is_client_error() {
        let response = post_request("/api/generate_report", json!({"data": []}), false).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn generate_report_degrades_on_upstream_failure() {
        let record = json!({"STATE": "S", "LOCATIONS": "X", "pH": 7.0});
        let response = post_request("/api/generate_report", json!({"data": [record]}), true).await;
        // Placeholder sections, but still a PDF.
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn healthz_ok() {
        let response = get_request("/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
