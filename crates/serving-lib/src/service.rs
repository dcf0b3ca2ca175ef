//! Prediction service
//!
//! Dispatches a validated request to the registry and turns the outcome
//! into a [`PredictionResult`] or a [`PredictError`].

use crate::error::PredictError;
use crate::models::{ModelId, PredictionResult};
use crate::observability::{ServingMetrics, StructuredLogger};
use crate::registry::ModelRegistry;
use std::sync::Arc;
use std::time::Instant;

/// Stateless prediction front end over a shared, read-only registry
#[derive(Clone)]
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    metrics: ServingMetrics,
    logger: StructuredLogger,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>, logger: StructuredLogger) -> Self {
        Self {
            registry,
            metrics: ServingMetrics::new(),
            logger,
        }
    }

    /// Run one prediction.
    ///
    /// Blocks for the duration of the model call. Unavailable models are
    /// reported as such; any predictor error, or a non-finite output,
    /// becomes [`PredictError::InferenceFailed`].
    pub fn predict(
        &self,
        model: ModelId,
        features: &[f64],
    ) -> Result<PredictionResult, PredictError> {
        let predictor = match self.registry.lookup(model) {
            Ok(p) => p,
            Err(e) => {
                self.logger.log_model_unavailable(model);
                self.metrics.inc_prediction_errors(model, e.kind());
                return Err(e);
            }
        };

        let start = Instant::now();
        let outcome = predictor.predict(features).and_then(|value| {
            anyhow::ensure!(value.is_finite(), "Model returned non-finite value {}", value);
            Ok(value)
        });
        let elapsed = start.elapsed().as_secs_f64();
        self.metrics.observe_prediction_latency(model, elapsed);

        match outcome {
            Ok(prediction) => {
                self.metrics.inc_predictions(model);
                self.logger.log_prediction(model, features.len(), prediction, elapsed);
                Ok(PredictionResult { prediction })
            }
            Err(e) => {
                self.logger.log_inference_failure(model, features.len(), &e);
                let err = PredictError::InferenceFailed(model);
                self.metrics.inc_prediction_errors(model, err.kind());
                Err(err)
            }
        }
    }
}
