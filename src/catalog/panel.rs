use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::Segment;
use crate::model::encoding::{encode, EncodeError, ENCODING_WIDTH};
use crate::model::{ModelError, ModelSetData, VersionClassifier};

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Failed to read reference panel: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse reference panel: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Reference for {segment} is empty")]
    EmptyReference { segment: Segment },

    #[error("Invalid reference for {segment}: {source}")]
    InvalidReference {
        segment: Segment,
        source: EncodeError,
    },

    #[error("{segment} has both a reference sequence and a fixed version")]
    FixedOverlap { segment: Segment },

    #[error("No reference sequence or fixed version for {segment}")]
    MissingSegment { segment: Segment },

    #[error("No model for {segment}")]
    MissingModel { segment: Segment },

    #[error("Model for {segment} expects {model} features but the reference implies {reference}")]
    FeatureWidth {
        segment: Segment,
        model: usize,
        reference: usize,
    },
}

/// Reference panel version for compatibility checking
pub const PANEL_VERSION: &str = "1.0.0";

/// Serializable reference panel format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelData {
    pub version: String,
    pub created_at: String,
    pub references: BTreeMap<Segment, String>,
    #[serde(default)]
    pub fixed_versions: BTreeMap<Segment, String>,
}

impl PanelData {
    /// Parse panel data from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `PanelError::ParseError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, PanelError> {
        let data: PanelData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != PANEL_VERSION {
            eprintln!(
                "Warning: Reference panel version mismatch (expected {}, found {})",
                PANEL_VERSION, data.version
            );
        }

        Ok(data)
    }
}

/// The reference panel: per-segment reference sequences, their classifiers,
/// and the fixed display versions for segments that are never predicted.
///
/// Immutable once built; every segment is covered either by a reference (and
/// a classifier) or by a fixed version, never both.
pub struct ReferencePanel {
    references: BTreeMap<Segment, String>,
    classifiers: BTreeMap<Segment, Box<dyn VersionClassifier>>,
    fixed_versions: BTreeMap<Segment, String>,
}

impl ReferencePanel {
    /// Assemble and validate a panel from its parts.
    ///
    /// # Errors
    ///
    /// Returns `PanelError` if a reference is empty or carries unsupported
    /// symbols, a segment is covered twice or not at all, a reference
    /// segment has no classifier, or a classifier's feature width does not
    /// match its reference length.
    pub fn new(
        references: BTreeMap<Segment, String>,
        classifiers: BTreeMap<Segment, Box<dyn VersionClassifier>>,
        fixed_versions: BTreeMap<Segment, String>,
    ) -> Result<Self, PanelError> {
        for (&segment, reference) in &references {
            if reference.is_empty() {
                return Err(PanelError::EmptyReference { segment });
            }
            encode(reference.as_bytes())
                .map_err(|source| PanelError::InvalidReference { segment, source })?;
            if fixed_versions.contains_key(&segment) {
                return Err(PanelError::FixedOverlap { segment });
            }

            let classifier = classifiers
                .get(&segment)
                .ok_or(PanelError::MissingModel { segment })?;
            let expected = reference.len() * ENCODING_WIDTH;
            if classifier.feature_len() != expected {
                return Err(PanelError::FeatureWidth {
                    segment,
                    model: classifier.feature_len(),
                    reference: expected,
                });
            }
        }

        for segment in Segment::ALL {
            if !references.contains_key(&segment) && !fixed_versions.contains_key(&segment) {
                return Err(PanelError::MissingSegment { segment });
            }
        }

        Ok(Self {
            references,
            classifiers,
            fixed_versions,
        })
    }

    /// Load the embedded default panel and models
    ///
    /// # Errors
    ///
    /// Returns `PanelError` if the embedded data is corrupt.
    pub fn load_embedded() -> Result<Self, PanelError> {
        // Embedded at compile time; validated by build.rs
        const EMBEDDED_PANEL: &str = include_str!("../../data/references.json");
        let data = PanelData::from_json(EMBEDDED_PANEL)?;
        let models = ModelSetData::load_embedded()?;
        Self::from_data(data, models)
    }

    /// Load a panel from reference and model artifact files
    ///
    /// # Errors
    ///
    /// Returns `PanelError` if either file cannot be read or is invalid.
    pub fn load_from_files(references_path: &Path, models_path: &Path) -> Result<Self, PanelError> {
        let content = std::fs::read_to_string(references_path)?;
        let data = PanelData::from_json(&content)?;
        let models = ModelSetData::load_from_file(models_path)?;
        Self::from_data(data, models)
    }

    /// Pair parsed panel data with its models and validate the result.
    fn from_data(data: PanelData, mut models: ModelSetData) -> Result<Self, PanelError> {
        let mut classifiers: BTreeMap<Segment, Box<dyn VersionClassifier>> = BTreeMap::new();
        for &segment in data.references.keys() {
            let model = models
                .models
                .remove(&segment)
                .ok_or(PanelError::MissingModel { segment })?;
            classifiers.insert(segment, Box::new(model));
        }
        Self::new(data.references, classifiers, data.fixed_versions)
    }

    /// Reference sequence for a predicted segment
    #[must_use]
    pub fn reference(&self, segment: Segment) -> Option<&str> {
        self.references.get(&segment).map(String::as_str)
    }

    /// Classifier for a predicted segment
    #[must_use]
    pub fn classifier(&self, segment: Segment) -> Option<&dyn VersionClassifier> {
        self.classifiers.get(&segment).map(|c| c.as_ref())
    }

    /// Fixed display version for a segment that is never predicted
    #[must_use]
    pub fn fixed_version(&self, segment: Segment) -> Option<&str> {
        self.fixed_versions.get(&segment).map(String::as_str)
    }

    /// Segments with a reference and classifier, in report column order
    pub fn predicted_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.references.keys().copied()
    }

    /// Number of predicted segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Check if the panel predicts no segments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Export the panel's references and fixed versions to JSON
    ///
    /// # Errors
    ///
    /// Returns `PanelError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, PanelError> {
        let data = PanelData {
            version: PANEL_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            references: self.references.clone(),
            fixed_versions: self.fixed_versions.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }
}

impl std::fmt::Debug for ReferencePanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferencePanel")
            .field("references", &self.references.keys().collect::<Vec<_>>())
            .field("classifiers", &self.classifiers.keys().collect::<Vec<_>>())
            .field("fixed_versions", &self.fixed_versions)
            .finish()
    }
}
