//! ONNX inference using tract
//!
//! Runs regression graphs built from standard ONNX operators. The graph
//! must take one `[batch, N]` input; the batch axis is pinned to a single
//! row at load time, and the first element of the first output is the
//! prediction.

use super::Predictor;
use anyhow::{bail, ensure, Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tract_onnx::tract_core::internal::DimLike;
use tract_onnx::tract_hir::infer::Factoid;
use tracing::{debug, warn};

/// Inference latency above which a warning is logged
const SLOW_INFERENCE_MS: u128 = 50;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based predictor using tract for lightweight inference
pub struct OnnxPredictor {
    model: TractModel,
    input_type: DatumType,
    n_features: usize,
}

impl OnnxPredictor {
    /// Create a new predictor from model bytes
    pub fn new(model_bytes: &[u8]) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?;

        let declared = model.input_fact(0).context("Model declares no input")?;
        let (input_type, n_features) = Self::row_input(declared)?;

        let model = model
            .with_input_fact(0, InferenceFact::dt_shape(input_type, tvec!(1, n_features)))
            .context("Failed to set model input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;

        Ok(Self {
            model,
            input_type,
            n_features,
        })
    }

    /// Element type and feature width of a declared `[batch, N]` input.
    /// The batch axis may be unset, symbolic or fixed.
    fn row_input(declared: &InferenceFact) -> Result<(DatumType, usize)> {
        let input_type = declared.datum_type.concretize().unwrap_or(DatumType::F32);
        ensure!(
            input_type.is_float(),
            "Model input must be floating point, got {:?}",
            input_type
        );

        let dims: Vec<Option<usize>> = declared
            .shape
            .dims()
            .map(|d| d.concretize().and_then(|d| d.to_usize().ok()))
            .collect();
        if declared.shape.is_open() || dims.len() != 2 {
            bail!("Model input must be a [batch, features] matrix, got {:?}", declared);
        }

        let n_features = dims[1].context("Model input has no fixed feature width")?;
        Ok((input_type, n_features))
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Convert a feature row to a `[1, N]` tensor
    fn features_to_tensor(features: &[f64]) -> Result<Tensor> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, data.len()), data)
            .context("Failed to shape feature row")?;
        Ok(array.into())
    }

    /// Extract the scalar prediction from the first output tensor
    fn tensor_to_prediction(output: &Tensor) -> Result<f64> {
        let values = output
            .cast_to::<f32>()
            .context("Model output is not numeric")?;
        let view = values.to_array_view::<f32>()?;
        let first = view
            .iter()
            .next()
            .copied()
            .context("Model produced an empty output")?;
        Ok(first as f64)
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            bail!(
                "X has {} features, but the model is expecting {} features as input",
                features.len(),
                self.n_features
            );
        }

        let start = Instant::now();

        let input = Self::features_to_tensor(features)?
            .cast_to_dt(self.input_type)?
            .into_owned();
        let result = self
            .model
            .run(tvec!(input.into()))
            .context("Model execution failed")?;
        let output = result.first().context("No output from model")?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > SLOW_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms", SLOW_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Self::tensor_to_prediction(output)
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{linear_graph, Batch};
    use super::*;
    use tract_onnx::pb::tensor_proto::DataType;

    #[test]
    fn test_features_to_tensor_shape() {
        let tensor = OnnxPredictor::features_to_tensor(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(tensor.shape(), &[1, 3]);
    }

    #[test]
    fn test_empty_features_make_zero_width_row() {
        let tensor = OnnxPredictor::features_to_tensor(&[]).unwrap();
        assert_eq!(tensor.shape(), &[1, 0]);
    }

    #[test]
    fn test_tensor_to_prediction_takes_first_value() {
        let tensor: Tensor = tract_ndarray::arr2(&[[4.5f32]]).into();
        assert_eq!(OnnxPredictor::tensor_to_prediction(&tensor).unwrap(), 4.5);
    }

    #[test]
    fn test_tensor_to_prediction_accepts_f64_output() {
        let tensor: Tensor = tract_ndarray::arr2(&[[2.25f64]]).into();
        assert_eq!(OnnxPredictor::tensor_to_prediction(&tensor).unwrap(), 2.25);
    }

    #[test]
    fn test_tensor_to_prediction_rejects_empty_output() {
        let tensor: Tensor = tract_ndarray::Array2::<f32>::zeros((1, 0)).into();
        assert!(OnnxPredictor::tensor_to_prediction(&tensor).is_err());
    }

    #[test]
    fn test_garbage_bytes_do_not_load() {
        assert!(OnnxPredictor::new(&[0xff; 32]).is_err());
    }

    #[test]
    fn test_unset_batch_axis_is_pinned_to_one_row() {
        let bytes = linear_graph(&[1.0, 2.0, 3.0], 0.5, DataType::Float, Batch::Unset);
        let predictor = OnnxPredictor::new(&bytes).unwrap();

        assert_eq!(predictor.n_features(), 3);
        assert_eq!(predictor.predict(&[1.0, 2.0, 3.0]).unwrap(), 14.5);
        assert_eq!(predictor.predict(&[0.0, 0.0, 0.0]).unwrap(), 0.5);
    }

    #[test]
    fn test_named_batch_axis_loads() {
        let bytes = linear_graph(&[2.0, -1.0], 1.0, DataType::Float, Batch::Named("N"));
        let predictor = OnnxPredictor::new(&bytes).unwrap();
        assert_eq!(predictor.predict(&[3.0, 4.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_fixed_batch_axis_loads() {
        let bytes = linear_graph(&[1.0], 0.0, DataType::Float, Batch::Fixed(1));
        let predictor = OnnxPredictor::new(&bytes).unwrap();
        assert_eq!(predictor.predict(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_double_input_is_cast() {
        let bytes = linear_graph(&[0.5, 0.25], 0.0, DataType::Double, Batch::Unset);
        let predictor = OnnxPredictor::new(&bytes).unwrap();
        assert_eq!(predictor.predict(&[2.0, 4.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let bytes = linear_graph(&[1.0, 2.0, 3.0], 0.5, DataType::Float, Batch::Unset);
        let predictor = OnnxPredictor::new(&bytes).unwrap();

        assert!(predictor.predict(&[]).is_err());
        let err = predictor.predict(&[1.0]).unwrap_err();
        assert!(err.to_string().contains("expecting 3 features"));
    }
}
