//! Prediction outcome errors

use crate::models::ModelId;

/// Why a prediction could not be served.
///
/// Request validation happens before the service is called, so only the
/// server-side outcomes are represented here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    /// The model failed to load at startup and will stay unavailable
    #[error("{} model is not available", .0.display_name())]
    ModelUnavailable(ModelId),

    /// The model raised while running. The cause is logged, not exposed.
    #[error("Model inference failed")]
    InferenceFailed(ModelId),
}

impl PredictError {
    pub fn model(&self) -> ModelId {
        match self {
            PredictError::ModelUnavailable(id) | PredictError::InferenceFailed(id) => *id,
        }
    }

    /// Metric label for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::ModelUnavailable(_) => "unavailable",
            PredictError::InferenceFailed(_) => "inference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_names_model() {
        let err = PredictError::ModelUnavailable(ModelId::RandomForest);
        assert_eq!(err.to_string(), "Random Forest model is not available");
        assert_eq!(err.kind(), "unavailable");
    }

    #[test]
    fn test_inference_message_is_generic() {
        let err = PredictError::InferenceFailed(ModelId::LinearRegression);
        assert_eq!(err.to_string(), "Model inference failed");
        assert_eq!(err.model(), ModelId::LinearRegression);
    }
}
