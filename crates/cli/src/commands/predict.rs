//! Prediction command

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{format_prediction, print_error, print_record, OutputFormat};

/// Models served by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ModelName {
    LinearRegression,
    RandomForest,
}

impl ModelName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::LinearRegression => "linear_regression",
            ModelName::RandomForest => "random_forest",
        }
    }
}

#[derive(Tabled, Serialize)]
struct PredictionRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Features")]
    n_features: usize,
    #[tabled(rename = "Prediction")]
    #[serde(skip)]
    display: String,
    #[tabled(skip)]
    prediction: f64,
}

/// Request a prediction and print it
pub async fn run_prediction(
    client: &ApiClient,
    model: ModelName,
    features: Vec<f64>,
    format: OutputFormat,
) -> Result<()> {
    let n_features = features.len();
    let result = match client.predict(model.as_str(), features).await {
        Ok(r) => r,
        Err(e) => {
            print_error(&format!("Prediction with {} failed", model.as_str()));
            return Err(e);
        }
    };

    let row = PredictionRow {
        model: model.as_str().to_string(),
        n_features,
        display: format_prediction(result.prediction),
        prediction: result.prediction,
    };
    print_record(row, format);

    Ok(())
}
