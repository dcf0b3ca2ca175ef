//! Observability infrastructure for the model server
//!
//! Provides:
//! - Prometheus metrics (prediction latency, prediction and error counts, model availability)
//! - Structured JSON logging with tracing

use crate::models::ModelId;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServingMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServingMetricsInner {
    prediction_latency_seconds: HistogramVec,
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounterVec,
    models_available: IntGaugeVec,
}

impl ServingMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram_vec!(
                "model_server_prediction_latency_seconds",
                "Time spent running model inference for a prediction",
                &["model"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "model_server_predictions_total",
                "Total number of predictions served",
                &["model"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "model_server_prediction_errors_total",
                "Total number of failed predictions by error kind",
                &["model", "kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            models_available: register_int_gauge_vec!(
                "model_server_models_available",
                "Whether a model loaded at startup (1) or is unavailable (0)",
                &["model"]
            )
            .expect("Failed to register models_available"),
        }
    }
}

/// Serving metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServingMetrics {
    _private: (),
}

impl Default for ServingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServingMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServingMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record an inference latency observation
    pub fn observe_prediction_latency(&self, model: ModelId, duration_secs: f64) {
        self.inner()
            .prediction_latency_seconds
            .with_label_values(&[model.as_str()])
            .observe(duration_secs);
    }

    /// Increment served predictions counter
    pub fn inc_predictions(&self, model: ModelId) {
        self.inner()
            .predictions_total
            .with_label_values(&[model.as_str()])
            .inc();
    }

    /// Increment failed predictions counter
    pub fn inc_prediction_errors(&self, model: ModelId, kind: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[model.as_str(), kind])
            .inc();
    }

    /// Record whether a model is loaded
    pub fn set_model_available(&self, model: ModelId, available: bool) {
        self.inner()
            .models_available
            .with_label_values(&[model.as_str()])
            .set(i64::from(available));
    }
}

/// Structured logger for server events
///
/// Provides consistent JSON-formatted logging for model loading,
/// predictions and lifecycle events.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Log a successful model load
    pub fn log_model_loaded(
        &self,
        model: ModelId,
        path: &str,
        format: &str,
        size_bytes: usize,
        sha256: &str,
    ) {
        info!(
            event = "model_loaded",
            instance = %self.instance,
            model = %model,
            path = %path,
            format = %format,
            size_bytes = size_bytes,
            sha256 = %sha256,
            "Model loaded successfully"
        );
    }

    /// Log a model that could not be loaded
    pub fn log_model_load_failed(&self, model: ModelId, path: &str, error: &anyhow::Error) {
        error!(
            event = "model_load_failed",
            instance = %self.instance,
            model = %model,
            path = %path,
            error = %format!("{:#}", error),
            "Failed to load model, it will be unavailable"
        );
    }

    /// Log a served prediction
    pub fn log_prediction(
        &self,
        model: ModelId,
        n_features: usize,
        prediction: f64,
        latency_secs: f64,
    ) {
        info!(
            event = "prediction_served",
            instance = %self.instance,
            model = %model,
            n_features = n_features,
            prediction = prediction,
            latency_secs = latency_secs,
            "Prediction using {}: {}",
            model,
            prediction
        );
    }

    /// Log a prediction request for a model that never loaded
    pub fn log_model_unavailable(&self, model: ModelId) {
        warn!(
            event = "prediction_failed",
            instance = %self.instance,
            model = %model,
            kind = "unavailable",
            "Prediction requested for unavailable model"
        );
    }

    /// Log a failed inference with the underlying cause
    pub fn log_inference_failure(&self, model: ModelId, n_features: usize, error: &anyhow::Error) {
        error!(
            event = "prediction_failed",
            instance = %self.instance,
            model = %model,
            kind = "inference",
            n_features = n_features,
            error = %format!("{:#}", error),
            "Model inference failed"
        );
    }

    /// Log server startup
    pub fn log_startup(&self, version: &str, addr: &str, models_available: usize) {
        info!(
            event = "server_started",
            instance = %self.instance,
            server_version = %version,
            addr = %addr,
            models_available = models_available,
            "Model server started"
        );
    }

    /// Log server shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "server_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Model server shutting down"
        );
    }
}
