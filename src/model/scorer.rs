//! The trained classifier, consumed as an opaque scoring function.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;
use crate::features::{FEATURE_COUNT, FeatureVector};

/// Binary classifier over an assembled feature vector.
///
/// The pipeline assumes nothing beyond this contract: 13 values in canonical
/// order in, a {0, 1} label out.
pub trait Scorer: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError>;
}

#[derive(Debug, Deserialize)]
struct LogisticArtifact {
    weights: Vec<f64>,
    intercept: f64,
}

/// Logistic-regression scorer backed by a JSON artifact exported alongside
/// the training run (`{"weights": [...], "intercept": ...}`).
#[derive(Debug)]
pub struct LogisticScorer {
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticScorer {
    pub fn new(weights: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Load and validate the artifact once at startup.
    pub fn from_json_path(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)?;
        let artifact: LogisticArtifact = serde_json::from_str(&raw)?;
        let got = artifact.weights.len();
        let weights: [f64; FEATURE_COUNT] =
            artifact
                .weights
                .try_into()
                .map_err(|_| ModelError::ShapeMismatch {
                    expected: FEATURE_COUNT,
                    got,
                })?;
        Ok(Self::new(weights, artifact.intercept))
    }
}

impl Scorer for LogisticScorer {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        let logit: f64 = self
            .weights
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        // sigmoid(logit) >= 0.5 exactly when logit >= 0
        Ok(u8::from(logit >= 0.0))
    }
}
