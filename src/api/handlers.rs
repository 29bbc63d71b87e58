//! API handlers for the content service

use crate::content::PregnancyWeekRecord;
use crate::error::ServiceError;
use crate::metrics::METRICS;
use crate::pipeline::{PersonalizationRequest, PersonalizedContentService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PersonalizedContentService>,
}

/// API error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

fn error_response(err: ServiceError) -> (StatusCode, Json<ApiError>) {
    match err {
        ServiceError::NotFound(message) => {
            (StatusCode::NOT_FOUND, Json(ApiError::new("NOT_FOUND", message)))
        }
        ServiceError::BackendUnavailable(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("BACKEND_UNAVAILABLE", message)),
        ),
        ServiceError::ProfileUnavailable(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("PROFILE_UNAVAILABLE", message)),
        ),
        other => {
            error!("Request failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("INTERNAL_ERROR", other.to_string())),
            )
        }
    }
}

/// Get the reference record for one week
///
/// GET /api/v1/pregnancy/weeks/{week}
pub async fn get_week(
    State(state): State<AppState>,
    Path(week): Path<u32>,
) -> Result<Json<PregnancyWeekRecord>, (StatusCode, Json<ApiError>)> {
    match state.service.store().get_week(week) {
        Ok(record) => {
            METRICS.record_week_lookup(true);
            Ok(Json(record.clone()))
        }
        Err(e) => {
            METRICS.record_week_lookup(false);
            Err(error_response(e))
        }
    }
}

/// Trimester listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct TrimesterResponse {
    pub trimester: u32,
    pub weeks: Vec<PregnancyWeekRecord>,
}

/// Get all weeks of a trimester
///
/// GET /api/v1/pregnancy/trimesters/{trimester}
pub async fn get_trimester(
    State(state): State<AppState>,
    Path(trimester): Path<u32>,
) -> Result<Json<TrimesterResponse>, (StatusCode, Json<ApiError>)> {
    match state.service.store().get_trimester(trimester) {
        Ok(records) => Ok(Json(TrimesterResponse {
            trimester,
            weeks: records.into_iter().cloned().collect(),
        })),
        Err(e) => Err(error_response(e)),
    }
}

/// Semantic search request
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    pub record: PregnancyWeekRecord,
}

/// Semantic search response. `degraded` is set when the vector backend
/// was unavailable; the request still succeeds with empty results.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub degraded: bool,
}

/// Search weeks by similarity
///
/// POST /api/v1/pregnancy/search
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ApiError>)> {
    if request.query.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("VALIDATION_ERROR", "Query cannot be empty")),
        ));
    }

    let _timer = METRICS
        .request_duration
        .with_label_values(&["search"])
        .start_timer();

    match state
        .service
        .store()
        .semantic_search(&request.query, request.limit)
        .await
    {
        Ok(results) => {
            METRICS.record_search(true);
            Ok(Json(SearchResponse {
                query: request.query,
                results: results
                    .into_iter()
                    .map(|(record, score)| SearchHit { score, record })
                    .collect(),
                degraded: false,
            }))
        }
        Err(ServiceError::BackendUnavailable(reason)) => {
            info!("Search degraded: {}", reason);
            METRICS.record_search(false);
            Ok(Json(SearchResponse {
                query: request.query,
                results: Vec::new(),
                degraded: true,
            }))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// Personalize a week for a patient
///
/// POST /api/v1/pregnancy/personalized
pub async fn personalized(
    State(state): State<AppState>,
    Json(request): Json<PersonalizationRequest>,
) -> Result<
    Json<crate::personalization::PersonalizationResult>,
    (StatusCode, Json<ApiError>),
> {
    if request.patient_id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("VALIDATION_ERROR", "Patient id cannot be empty")),
        ));
    }

    let _timer = METRICS
        .request_duration
        .with_label_values(&["personalized"])
        .start_timer();

    match state.service.personalized_week(request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => Err(error_response(e)),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub search_ready: bool,
}

/// Service health
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        search_ready: state.service.store().search_ready(),
    })
}

/// Prometheus metrics export
///
/// GET /metrics
pub async fn metrics() -> String {
    METRICS.export_prometheus()
}
