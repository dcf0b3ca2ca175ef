//! Predictor capability and the artifact formats that provide it

#[cfg(test)]
mod fixtures;
mod forest;
mod inference;
mod linear;

pub use forest::{ForestModel, ForestPredictor, TreeNodes};
pub use inference::OnnxPredictor;
pub use linear::{LinearCoefficients, LinearPredictor};

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Trait for prediction implementations.
///
/// A predictor takes one sample (a row of `features.len()` columns) and
/// returns a single scalar. Width mismatches and numeric faults are errors.
pub trait Predictor: Send + Sync {
    /// Predict the target for a single sample
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Short name of the backend, for logs
    fn backend(&self) -> &'static str;
}

/// On-disk model artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// ONNX graph executed with tract
    Onnx,
    /// JSON linear coefficients
    LinearJson,
    /// JSON regression trees of a random forest
    ForestJson,
}

impl ArtifactFormat {
    /// Pick the format from the file extension. JSON artifacts are told
    /// apart by their top-level keys: `trees` for a forest, `coefficients`
    /// for a linear model.
    pub fn detect(path: &Path, bytes: &[u8]) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("onnx") => Ok(ArtifactFormat::Onnx),
            Some("json") => Self::detect_json(bytes),
            Some(other) => bail!("Unsupported model artifact extension `.{}`", other),
            None => bail!("Model artifact {:?} has no file extension", path),
        }
    }

    fn detect_json(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).context("Model artifact is not valid JSON")?;
        let Some(object) = value.as_object() else {
            bail!("JSON model artifact must be an object");
        };

        if object.contains_key("trees") {
            Ok(ArtifactFormat::ForestJson)
        } else if object.contains_key("coefficients") {
            Ok(ArtifactFormat::LinearJson)
        } else {
            bail!("JSON model artifact has neither `trees` nor `coefficients`")
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Onnx => f.write_str("onnx"),
            ArtifactFormat::LinearJson => f.write_str("linear_json"),
            ArtifactFormat::ForestJson => f.write_str("forest_json"),
        }
    }
}

/// Provenance of a loaded artifact
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub format: ArtifactFormat,
    pub size_bytes: usize,
    pub sha256: String,
}

/// Load a predictor from a model artifact on disk
pub fn load_artifact(path: &Path) -> Result<(Arc<dyn Predictor>, ArtifactInfo)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read model artifact {:?}", path))?;
    let format = ArtifactFormat::detect(path, &bytes)?;

    let predictor: Arc<dyn Predictor> = match format {
        ArtifactFormat::Onnx => Arc::new(OnnxPredictor::new(&bytes)?),
        ArtifactFormat::LinearJson => Arc::new(LinearPredictor::from_json(&bytes)?),
        ArtifactFormat::ForestJson => Arc::new(ForestPredictor::from_json(&bytes)?),
    };

    let info = ArtifactInfo {
        format,
        size_bytes: bytes.len(),
        sha256: hex::encode(Sha256::digest(&bytes)),
    };

    Ok((predictor, info))
}
