use std::collections::BTreeMap;

use crate::core::segment::Segment;

/// One biological sample: an identifier plus the raw nucleotide sequence of
/// each segment that was supplied for it.
///
/// Sequences are stored uppercase; the reader normalizes case on ingest.
/// Segments iterate in report column order.
#[derive(Debug, Clone, Default)]
pub struct Sample {
    pub id: String,
    segments: BTreeMap<Segment, String>,
}

impl Sample {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            segments: BTreeMap::new(),
        }
    }

    /// Insert a segment sequence, replacing any previous one.
    ///
    /// Returns the replaced sequence when the segment was already present,
    /// so callers can report duplicate records.
    pub fn insert_sequence(&mut self, segment: Segment, sequence: String) -> Option<String> {
        self.segments.insert(segment, sequence)
    }

    #[must_use]
    pub fn sequence(&self, segment: Segment) -> Option<&str> {
        self.segments.get(&segment).map(String::as_str)
    }

    /// Number of segment sequences supplied for this sample.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Segment, &str)> {
        self.segments.iter().map(|(s, seq)| (*s, seq.as_str()))
    }
}
