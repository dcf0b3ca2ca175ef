//! Native random forest regressor evaluated from exported trees
//!
//! Each tree is stored as parallel node arrays, the same layout a fitted
//! regression tree exposes (`feature`, `threshold`, `children_left`,
//! `children_right`, `value`). A child index of `-1` marks a leaf. The
//! forest prediction is the mean of the leaf values reached in every tree.

use super::Predictor;
use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Child index marking a leaf node
const LEAF: i64 = -1;

/// One regression tree as parallel node arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNodes {
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub left: Vec<i64>,
    pub right: Vec<i64>,
    pub value: Vec<f64>,
}

impl TreeNodes {
    fn len(&self) -> usize {
        self.feature.len()
    }

    fn validate(&self, index: usize, n_features: usize) -> Result<()> {
        let n = self.len();
        ensure!(n > 0, "Tree {} has no nodes", index);
        ensure!(
            [
                self.threshold.len(),
                self.left.len(),
                self.right.len(),
                self.value.len()
            ]
            .iter()
            .all(|len| *len == n),
            "Tree {} has node arrays of different lengths",
            index
        );

        for node in 0..n {
            let (left, right) = (self.left[node], self.right[node]);
            if left == LEAF && right == LEAF {
                ensure!(
                    self.value[node].is_finite(),
                    "Tree {} leaf {} has a non-finite value",
                    index,
                    node
                );
                continue;
            }
            // Children always come after their parent, so traversal terminates
            for child in [left, right] {
                ensure!(
                    child > node as i64 && (child as usize) < n,
                    "Tree {} node {} has invalid child {}",
                    index,
                    node,
                    child
                );
            }
            let feature = self.feature[node];
            ensure!(
                feature >= 0 && (feature as usize) < n_features,
                "Tree {} node {} splits on feature {} of {}",
                index,
                node,
                feature,
                n_features
            );
            ensure!(
                !self.threshold[node].is_nan(),
                "Tree {} node {} has a NaN threshold",
                index,
                node
            );
        }
        Ok(())
    }

    /// Walk from the root to a leaf. Nodes are validated, so indices are in range.
    fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            let (left, right) = (self.left[node], self.right[node]);
            if left == LEAF && right == LEAF {
                return self.value[node];
            }
            let x = features[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                left as usize
            } else {
                right as usize
            };
        }
    }
}

/// Exported random forest regressor (`n_features_in_` and `estimators_`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<TreeNodes>,
}

/// Predictor averaging the outputs of a forest of regression trees
#[derive(Debug, Clone)]
pub struct ForestPredictor {
    model: ForestModel,
}

impl ForestPredictor {
    pub fn new(model: ForestModel) -> Result<Self> {
        ensure!(model.n_features > 0, "Forest declares zero input features");
        ensure!(!model.trees.is_empty(), "Forest has no trees");
        for (index, tree) in model.trees.iter().enumerate() {
            tree.validate(index, model.n_features)?;
        }
        Ok(Self { model })
    }

    /// Parse a JSON forest artifact
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let model: ForestModel =
            serde_json::from_slice(bytes).context("Failed to parse random forest trees")?;
        Self::new(model)
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.model.trees.len()
    }
}

impl Predictor for ForestPredictor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features() {
            bail!(
                "X has {} features, but the model is expecting {} features as input",
                features.len(),
                self.n_features()
            );
        }
        if features.iter().any(|x| x.is_nan()) {
            bail!("Input contains NaN");
        }

        let total: f64 = self
            .model
            .trees
            .iter()
            .map(|tree| tree.leaf_value(features))
            .sum();
        Ok(total / self.n_trees() as f64)
    }

    fn backend(&self) -> &'static str {
        "forest"
    }
}
