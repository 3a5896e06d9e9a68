use serde::Serialize;

/// Label shown for a sample whose genotype could not be assigned.
pub const UNASSIGNED_LABEL: &str = "[unassigned]";

/// Confidence state of a per-segment version call.
///
/// `Accepted` is the only state that does not raise the sample-level
/// low-confidence flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallConfidence {
    /// Probability cleared the acceptance threshold.
    Accepted,
    /// Probability fell in the intermediate band; the version is kept but
    /// displayed with a `*` marker.
    LowConfidence,
    /// Probability fell below the minimum, or alignment/encoding failed.
    Unassigned,
    /// No sequence was supplied for the segment.
    Missing,
}

impl CallConfidence {
    /// The note this state contributes to the report, if any.
    #[must_use]
    pub fn note(&self) -> Option<&'static str> {
        match self {
            CallConfidence::Accepted => None,
            CallConfidence::LowConfidence => Some("low confidence"),
            CallConfidence::Unassigned => Some("unassigned"),
            CallConfidence::Missing => Some("missing"),
        }
    }

    /// Whether this state raises the sample's low-confidence flag.
    #[must_use]
    pub fn raises_flag(&self) -> bool {
        !matches!(self, CallConfidence::Accepted)
    }
}

/// The outcome of classifying one segment of one sample.
///
/// The version label is stored bare; the `*` marker for low-confidence calls
/// exists only in the display form, so the label can be compared against the
/// composition table without stripping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    confidence: CallConfidence,
    probability: f64,
}

impl VersionCall {
    #[must_use]
    pub fn accepted(version: impl Into<String>, probability: f64) -> Self {
        Self {
            version: Some(version.into()),
            confidence: CallConfidence::Accepted,
            probability,
        }
    }

    #[must_use]
    pub fn low_confidence(version: impl Into<String>, probability: f64) -> Self {
        Self {
            version: Some(version.into()),
            confidence: CallConfidence::LowConfidence,
            probability,
        }
    }

    #[must_use]
    pub fn unassigned(probability: f64) -> Self {
        Self {
            version: None,
            confidence: CallConfidence::Unassigned,
            probability,
        }
    }

    #[must_use]
    pub fn missing() -> Self {
        Self {
            version: None,
            confidence: CallConfidence::Missing,
            probability: 0.0,
        }
    }

    /// The bare version label, if one was called.
    ///
    /// This is the value the resolver matches against the composition table;
    /// it is present for both accepted and low-confidence calls.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn confidence(&self) -> CallConfidence {
        self.confidence
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    #[must_use]
    pub fn note(&self) -> Option<&'static str> {
        self.confidence.note()
    }

    #[must_use]
    pub fn raises_flag(&self) -> bool {
        self.confidence.raises_flag()
    }
}

impl std::fmt::Display for VersionCall {
    /// The human-readable form: the version label, `<label>*` for a
    /// low-confidence call, or `?` when no version was called.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.version, self.confidence) {
            (Some(v), CallConfidence::Accepted) => write!(f, "{v}"),
            (Some(v), CallConfidence::LowConfidence) => write!(f, "{v}*"),
            _ => write!(f, "?"),
        }
    }
}

/// The terminal genotype decision for one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenotypeVerdict {
    #[serde(skip_serializing_if = "Option::is_none")]
    genotype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl GenotypeVerdict {
    #[must_use]
    pub fn assigned(genotype: impl Into<String>) -> Self {
        Self {
            genotype: Some(genotype.into()),
            note: None,
        }
    }

    #[must_use]
    pub fn unassigned(note: impl Into<String>) -> Self {
        Self {
            genotype: None,
            note: Some(note.into()),
        }
    }

    #[must_use]
    pub fn genotype(&self) -> Option<&str> {
        self.genotype.as_deref()
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.genotype.is_some()
    }
}

impl std::fmt::Display for GenotypeVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.genotype {
            Some(g) => write!(f, "{g}"),
            None => write!(f, "{UNASSIGNED_LABEL}"),
        }
    }
}
