//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use utoipa::OpenApi;

use crate::error::AppError;
use crate::status::{StatusResponse, StatusService};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Status lookups backed by the cache file.
    pub status: StatusService,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state without a metrics recorder.
    pub fn new(status: StatusService) -> Self {
        Self {
            status,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// OpenAPI document for the public endpoint.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Telegram Online Status - Public API",
        description = "Checks whether the configured Telegram account was recently online and returns it as JSON."
    ),
    paths(data),
    components(schemas(StatusResponse))
)]
pub struct ApiDoc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Whether the account was recently online, served from cache when fresh.
#[utoipa::path(
    get,
    path = "/data",
    responses(
        (status = 200, description = "Current online status", body = StatusResponse),
        (status = 500, description = "Cache or Telegram failure")
    )
)]
pub async fn data(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let response = state.status.current_status().await?;
    Ok(Json(response))
}

/// Prometheus exposition - 404 when no recorder is installed.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Serve the OpenAPI document.
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
