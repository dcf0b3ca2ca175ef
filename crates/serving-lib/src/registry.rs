//! Model registry
//!
//! Holds one slot per served model. Slots are filled once at startup and
//! never change afterwards, so lookups need no locking.

use crate::error::PredictError;
use crate::models::ModelId;
use crate::observability::StructuredLogger;
use crate::predictor::{load_artifact, Predictor};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Artifact locations for each model
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub linear_regression: PathBuf,
    pub random_forest: PathBuf,
}

impl ModelPaths {
    pub fn get(&self, id: ModelId) -> &PathBuf {
        match id {
            ModelId::LinearRegression => &self.linear_regression,
            ModelId::RandomForest => &self.random_forest,
        }
    }
}

/// State of a single model slot
#[derive(Clone)]
pub enum ModelSlot {
    Ready(Arc<dyn Predictor>),
    Unavailable { reason: String },
}

impl ModelSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelSlot::Ready(_))
    }
}

impl fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSlot::Ready(p) => f.debug_tuple("Ready").field(&p.backend()).finish(),
            ModelSlot::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Registry of loaded predictors
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    slots: HashMap<ModelId, ModelSlot>,
}

impl ModelRegistry {
    /// Load every model from its artifact.
    ///
    /// Each model is loaded independently. A failure is logged and leaves
    /// the slot unavailable for the lifetime of the process; it never
    /// aborts startup.
    pub fn load(paths: &ModelPaths, logger: &StructuredLogger) -> Self {
        let mut builder = Self::builder();

        for id in ModelId::ALL {
            let path = paths.get(id);
            let path_display = path.display().to_string();

            builder = match load_artifact(path) {
                Ok((predictor, info)) => {
                    logger.log_model_loaded(
                        id,
                        &path_display,
                        &info.format.to_string(),
                        info.size_bytes,
                        &info.sha256,
                    );
                    builder.with_predictor(id, predictor)
                }
                Err(e) => {
                    logger.log_model_load_failed(id, &path_display, &e);
                    builder.unavailable(id, format!("{:#}", e))
                }
            };
        }

        builder.build()
    }

    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Look up a predictor by id
    pub fn lookup(&self, id: ModelId) -> Result<Arc<dyn Predictor>, PredictError> {
        match self.slots.get(&id) {
            Some(ModelSlot::Ready(predictor)) => Ok(Arc::clone(predictor)),
            _ => Err(PredictError::ModelUnavailable(id)),
        }
    }

    /// Slot state for a model
    pub fn slot(&self, id: ModelId) -> Option<&ModelSlot> {
        self.slots.get(&id)
    }

    /// Readiness of every known model, in `ModelId::ALL` order
    pub fn availability(&self) -> Vec<(ModelId, bool)> {
        ModelId::ALL
            .iter()
            .map(|id| (*id, self.slots.get(id).is_some_and(ModelSlot::is_ready)))
            .collect()
    }

    pub fn available_count(&self) -> usize {
        self.slots.values().filter(|s| s.is_ready()).count()
    }
}

/// Builder for a [`ModelRegistry`]. Models that are never set are
/// unavailable.
#[derive(Default)]
pub struct ModelRegistryBuilder {
    slots: HashMap<ModelId, ModelSlot>,
}

impl ModelRegistryBuilder {
    pub fn with_predictor(mut self, id: ModelId, predictor: Arc<dyn Predictor>) -> Self {
        self.slots.insert(id, ModelSlot::Ready(predictor));
        self
    }

    pub fn unavailable(mut self, id: ModelId, reason: impl Into<String>) -> Self {
        self.slots.insert(
            id,
            ModelSlot::Unavailable {
                reason: reason.into(),
            },
        );
        self
    }

    pub fn build(mut self) -> ModelRegistry {
        for id in ModelId::ALL {
            self.slots.entry(id).or_insert_with(|| ModelSlot::Unavailable {
                reason: "not configured".to_string(),
            });
        }
        ModelRegistry { slots: self.slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{LinearCoefficients, LinearPredictor};
    use std::io::Write;

    fn linear() -> Arc<dyn Predictor> {
        Arc::new(
            LinearPredictor::new(LinearCoefficients {
                coefficients: vec![1.0, 1.0],
                intercept: 0.0,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_builder_defaults_to_unavailable() {
        let registry = ModelRegistry::builder()
            .with_predictor(ModelId::LinearRegression, linear())
            .build();

        assert!(registry.lookup(ModelId::LinearRegression).is_ok());
        assert_eq!(
            registry.lookup(ModelId::RandomForest).err(),
            Some(PredictError::ModelUnavailable(ModelId::RandomForest))
        );
        assert_eq!(
            registry.availability(),
            vec![
                (ModelId::LinearRegression, true),
                (ModelId::RandomForest, false)
            ]
        );
        assert_eq!(registry.available_count(), 1);
    }

    #[test]
    fn test_load_tolerates_independent_failures() {
        let dir = tempfile::tempdir().unwrap();
        let lr_path = dir.path().join("linear_regression_model.json");
        let mut f = std::fs::File::create(&lr_path).unwrap();
        write!(f, r#"{{"coefficients":[1.0,2.0,3.0],"intercept":1.0}}"#).unwrap();

        let paths = ModelPaths {
            linear_regression: lr_path,
            random_forest: dir.path().join("random_forest_model.onnx"),
        };
        let registry = ModelRegistry::load(&paths, &StructuredLogger::new("test"));

        let lr = registry.lookup(ModelId::LinearRegression).unwrap();
        assert_eq!(lr.predict(&[1.0, 2.0, 3.0]).unwrap(), 15.0);

        assert!(registry.lookup(ModelId::RandomForest).is_err());
        match registry.slot(ModelId::RandomForest) {
            Some(ModelSlot::Unavailable { reason }) => {
                assert!(reason.contains("Failed to read model artifact"))
            }
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_load_with_no_artifacts_still_builds() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths {
            linear_regression: dir.path().join("lr.onnx"),
            random_forest: dir.path().join("rf.onnx"),
        };
        let registry = ModelRegistry::load(&paths, &StructuredLogger::new("test"));
        assert_eq!(registry.available_count(), 0);
    }
}
