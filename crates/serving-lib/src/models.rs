//! Core data models for the model server

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one of the served regression models.
///
/// The set is closed: anything else is rejected while deserializing the
/// request, before the registry is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    LinearRegression,
    RandomForest,
}

impl ModelId {
    /// Every model the server knows about, in registry order
    pub const ALL: [ModelId; 2] = [ModelId::LinearRegression, ModelId::RandomForest];

    /// Wire tag, as used in the `model` query parameter and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::LinearRegression => "linear_regression",
            ModelId::RandomForest => "random_forest",
        }
    }

    /// Human readable name used in error details
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::LinearRegression => "Linear Regression",
            ModelId::RandomForest => "Random Forest",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters of `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictParams {
    pub model: ModelId,
}

/// Body of `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Feature values, in the column order the model was trained on
    pub features: Vec<f64>,
}

/// A single scalar prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: f64,
}

/// Error envelope returned for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_wire_tags() {
        assert_eq!(
            serde_json::to_string(&ModelId::LinearRegression).unwrap(),
            "\"linear_regression\""
        );
        let parsed: ModelId = serde_json::from_str("\"random_forest\"").unwrap();
        assert_eq!(parsed, ModelId::RandomForest);
    }

    #[test]
    fn test_model_id_rejects_unknown_tag() {
        assert!(serde_json::from_str::<ModelId>("\"svm\"").is_err());
        assert!(serde_json::from_str::<ModelId>("\"Linear Regression\"").is_err());
    }

    #[test]
    fn test_model_id_serde_matches_display() {
        for id in ModelId::ALL {
            let json = format!("\"{}\"", id);
            assert_eq!(serde_json::from_str::<ModelId>(&json).unwrap(), id);
        }
    }

    #[test]
    fn test_predict_request_requires_features() {
        assert!(serde_json::from_str::<PredictRequest>("{}").is_err());
        assert!(serde_json::from_str::<PredictRequest>(r#"{"features":["a"]}"#).is_err());

        let req: PredictRequest = serde_json::from_str(r#"{"features":[1, 2.5]}"#).unwrap();
        assert_eq!(req.features, vec![1.0, 2.5]);
    }
}
