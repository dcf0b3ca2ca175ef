//! Native linear model evaluated from exported coefficients

use super::Predictor;
use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Fitted coefficients of an ordinary least squares model, as exported
/// from the training pipeline (`coef_` and `intercept_`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearCoefficients {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

/// Predictor computing `intercept + coefficients . features`
#[derive(Debug, Clone)]
pub struct LinearPredictor {
    weights: LinearCoefficients,
}

impl LinearPredictor {
    pub fn new(weights: LinearCoefficients) -> Result<Self> {
        ensure!(
            !weights.coefficients.is_empty(),
            "Linear model has no coefficients"
        );
        ensure!(
            weights.intercept.is_finite() && weights.coefficients.iter().all(|c| c.is_finite()),
            "Linear model has non-finite weights"
        );
        Ok(Self { weights })
    }

    /// Parse a JSON coefficients artifact
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let weights: LinearCoefficients =
            serde_json::from_slice(bytes).context("Failed to parse linear coefficients")?;
        Self::new(weights)
    }

    pub fn n_features(&self) -> usize {
        self.weights.coefficients.len()
    }
}

impl Predictor for LinearPredictor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features() {
            bail!(
                "X has {} features, but the model is expecting {} features as input",
                features.len(),
                self.n_features()
            );
        }

        let dot: f64 = self
            .weights
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.weights.intercept + dot)
    }

    fn backend(&self) -> &'static str {
        "linear"
    }
}
