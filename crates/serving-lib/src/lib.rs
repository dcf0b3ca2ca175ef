//! Serving library for the regression model server
//!
//! This crate provides the core functionality for:
//! - Loading model artifacts into a read-only registry
//! - Dispatching predictions and classifying failures
//! - Liveness reporting
//! - Metrics and structured logging

pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod registry;
pub mod service;

pub use error::PredictError;
pub use health::{HealthState, HealthStatus};
pub use models::*;
pub use observability::{ServingMetrics, StructuredLogger};
pub use predictor::Predictor;
pub use registry::{ModelPaths, ModelRegistry, ModelSlot};
pub use service::PredictionService;
