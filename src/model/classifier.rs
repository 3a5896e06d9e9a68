//! Per-segment version classifiers.
//!
//! The pipeline treats classification as an opaque capability behind the
//! [`VersionClassifier`] trait: feature vector in, probability distribution
//! out. The bundled implementation, [`LinearModel`], is a sparse multinomial
//! logistic model trained offline and shipped as a JSON artifact.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::Segment;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model artifact: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse model artifact: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Model for {segment} defines no labels")]
    NoLabels { segment: Segment },

    #[error("Model for {segment}: {field} has {found} entries, expected {expected}")]
    BadArity {
        segment: Segment,
        field: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("Model for {segment}: weight index {index} out of range for {feature_len} features")]
    IndexOutOfRange {
        segment: Segment,
        index: u32,
        feature_len: usize,
    },
}

/// Model artifact version for compatibility checking
pub const MODELS_VERSION: &str = "1.0.0";

/// A trained classifier for one segment.
///
/// Implementations must keep `labels()` in a stable order and return
/// distributions parallel to it; callers rely on that order to break
/// probability ties deterministically across runs.
pub trait VersionClassifier {
    /// The label set, in the classifier's stable iteration order.
    fn labels(&self) -> &[String];

    /// Expected feature vector width.
    fn feature_len(&self) -> usize;

    /// Probability distribution over `labels()`, parallel by index.
    ///
    /// An unusable feature vector (wrong width) yields an empty vector,
    /// which callers treat as "no prediction" rather than an error.
    fn predict_distribution(&self, features: &[bool]) -> Vec<f64>;
}

/// Sparse multinomial logistic model.
///
/// Each label has a bias and a sparse weight row of `(feature_index, weight)`
/// pairs; a feature bit that is set adds the weight to that label's score.
/// Scores go through a softmax to become the returned distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    labels: Vec<String>,
    bias: Vec<f64>,
    weights: Vec<Vec<(u32, f64)>>,
    feature_len: usize,
}

impl LinearModel {
    /// Assemble a model from its parts without consistency checks; use
    /// `validate` to verify arity and index bounds.
    #[must_use]
    pub fn from_parts(
        labels: Vec<String>,
        bias: Vec<f64>,
        weights: Vec<Vec<(u32, f64)>>,
        feature_len: usize,
    ) -> Self {
        Self {
            labels,
            bias,
            weights,
            feature_len,
        }
    }

    /// Check internal consistency: parallel arities and in-range indexes.
    fn validate(&self, segment: Segment) -> Result<(), ModelError> {
        if self.labels.is_empty() {
            return Err(ModelError::NoLabels { segment });
        }
        if self.bias.len() != self.labels.len() {
            return Err(ModelError::BadArity {
                segment,
                field: "bias",
                found: self.bias.len(),
                expected: self.labels.len(),
            });
        }
        if self.weights.len() != self.labels.len() {
            return Err(ModelError::BadArity {
                segment,
                field: "weights",
                found: self.weights.len(),
                expected: self.labels.len(),
            });
        }
        for row in &self.weights {
            for &(index, _) in row {
                if index as usize >= self.feature_len {
                    return Err(ModelError::IndexOutOfRange {
                        segment,
                        index,
                        feature_len: self.feature_len,
                    });
                }
            }
        }
        Ok(())
    }
}

impl VersionClassifier for LinearModel {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn feature_len(&self) -> usize {
        self.feature_len
    }

    fn predict_distribution(&self, features: &[bool]) -> Vec<f64> {
        if features.len() != self.feature_len {
            return Vec::new();
        }

        let mut scores = self.bias.clone();
        for (score, row) in scores.iter_mut().zip(&self.weights) {
            for &(index, weight) in row {
                if features.get(index as usize).copied().unwrap_or(false) {
                    *score += weight;
                }
            }
        }

        // Softmax with max subtraction for numeric stability.
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for score in &mut scores {
            *score = (*score - max).exp();
            sum += *score;
        }
        if sum > 0.0 {
            for score in &mut scores {
                *score /= sum;
            }
        }
        scores
    }
}

/// Serializable model artifact format
#[derive(Debug, Deserialize)]
pub struct ModelSetData {
    pub version: String,
    pub created_at: String,
    pub models: BTreeMap<Segment, LinearModel>,
}

impl ModelSetData {
    /// Load the embedded default models
    ///
    /// # Errors
    ///
    /// Returns `ModelError` if the embedded artifact is corrupt.
    pub fn load_embedded() -> Result<Self, ModelError> {
        // Embedded at compile time; validated by build.rs
        const EMBEDDED_MODELS: &str = include_str!("../../data/models.json");
        Self::from_json(EMBEDDED_MODELS)
    }

    /// Load models from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ModelError` if the file cannot be read or is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate models from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ModelError` if the JSON is malformed or any model fails
    /// its consistency checks.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let data: ModelSetData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != MODELS_VERSION {
            eprintln!(
                "Warning: Model artifact version mismatch (expected {}, found {})",
                MODELS_VERSION, data.version
            );
        }

        for (&segment, model) in &data.models {
            model.validate(segment)?;
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_label_model() -> LinearModel {
        LinearModel::from_parts(
            vec!["v1".to_string(), "v2".to_string()],
            vec![0.0, 0.0],
            vec![vec![(0, 2.0)], vec![(3, 2.0)]],
            4,
        )
    }

    #[test]
    fn test_load_embedded_models() {
        let data = ModelSetData::load_embedded().unwrap();
        assert!(!data.models.is_empty());
        for model in data.models.values() {
            assert!(!model.labels().is_empty());
        }
    }

    #[test]
    fn test_softmax_distribution() {
        let model = two_label_model();
        let dist = model.predict_distribution(&[true, false, false, false]);

        assert_eq!(dist.len(), 2);
        let sum: f64 = dist.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // Scores are [2, 0], so p(v1) = e^2 / (e^2 + 1).
        assert!((dist[0] - 0.8808).abs() < 1e-4);
        assert!(dist[0] > dist[1]);
    }

    #[test]
    fn test_no_features_gives_uniform() {
        let model = two_label_model();
        let dist = model.predict_distribution(&[false; 4]);
        assert!((dist[0] - 0.5).abs() < 1e-12);
        assert!((dist[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_width_gives_empty_distribution() {
        let model = two_label_model();
        assert!(model.predict_distribution(&[true; 3]).is_empty());
        assert!(model.predict_distribution(&[]).is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_arity() {
        let model = LinearModel::from_parts(
            vec!["v1".to_string(), "v2".to_string()],
            vec![0.0],
            vec![vec![], vec![]],
            4,
        );
        assert!(matches!(
            model.validate(Segment::Pb2),
            Err(ModelError::BadArity { field: "bias", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let model = LinearModel::from_parts(
            vec!["v1".to_string()],
            vec![0.0],
            vec![vec![(4, 1.0)]],
            4,
        );
        assert!(matches!(
            model.validate(Segment::Np),
            Err(ModelError::IndexOutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_labels() {
        let model = LinearModel::from_parts(vec![], vec![], vec![], 4);
        assert!(matches!(
            model.validate(Segment::Na),
            Err(ModelError::NoLabels { .. })
        ));
    }
}
