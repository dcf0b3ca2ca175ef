//! HTTP API for predictions, health checks and Prometheus metrics

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serving_lib::{
    health, ErrorResponse, PredictError, PredictParams, PredictRequest, PredictionService,
    ServingMetrics,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
    pub metrics: ServingMetrics,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service,
            metrics: ServingMetrics::new(),
        }
    }
}

/// Everything a request can fail with, mapped 1:1 to a status code
#[derive(Debug)]
pub enum ApiError {
    /// Query or body did not match the request schema
    Validation(String),
    Predict(PredictError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Predict(PredictError::ModelUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Predict(PredictError::InferenceFailed(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Validation(reason) => reason.clone(),
            ApiError::Predict(e) => e.to_string(),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.detail()))).into_response()
    }
}

/// Liveness probe - always 200 while the process is running
async fn health_check() -> impl IntoResponse {
    info!(event = "health_check", "Health check endpoint called");
    Json(health::check())
}

/// Run a prediction with the model named in the query string
async fn predict(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PredictParams>, QueryRejection>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected predict query");
        ApiError::Validation(rejection.body_text())
    })?;
    let Json(request) = body.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected predict body");
        ApiError::Validation(rejection.body_text())
    })?;

    let model = params.model;
    let service = state.service.clone();

    // Inference is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || service.predict(model, &request.features))
        .await
        .map_err(|e| {
            // Panics skip the error accounting in the service
            error!(model = %model, error = %e, "Inference task did not complete");
            let err = PredictError::InferenceFailed(model);
            state.metrics.inc_prediction_errors(model, err.kind());
            ApiError::Predict(err)
        })??;

    Ok(Json(result))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %listener.local_addr()?, "Starting API server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
