use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::catalog::{GenotypeTable, ReferencePanel};
use crate::core::{GenotypeVerdict, Sample, Segment, VersionCall};
use crate::typing::predictor::SegmentPredictor;
use crate::typing::resolver::GenotypeResolver;

/// Result of genotyping one sample
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    /// Sample identifier from the input
    pub sample_name: String,

    /// Terminal genotype verdict
    pub verdict: GenotypeVerdict,

    /// Per-segment version calls, one per predicted segment
    pub calls: BTreeMap<Segment, VersionCall>,
}

/// Drives prediction and resolution across all segments of one sample.
pub struct SamplePipeline<'a> {
    panel: &'a ReferencePanel,
    predictor: SegmentPredictor<'a>,
    resolver: GenotypeResolver<'a>,
}

impl<'a> SamplePipeline<'a> {
    pub fn new(panel: &'a ReferencePanel, table: &'a GenotypeTable) -> Self {
        Self {
            panel,
            predictor: SegmentPredictor::new(panel),
            resolver: GenotypeResolver::new(table),
        }
    }

    /// Genotype one sample.
    ///
    /// Every predicted segment gets exactly one call: segments the sample
    /// did not supply are synthesized as missing. The combined calls then
    /// resolve to a single verdict, so even an empty sample produces a
    /// complete (if degraded) report.
    #[must_use]
    pub fn genotype_sample(&self, sample: &Sample) -> SampleReport {
        let mut calls = BTreeMap::new();
        for segment in self.panel.predicted_segments() {
            let call = match sample.sequence(segment) {
                Some(sequence) => self.predictor.predict(segment, sequence),
                None => VersionCall::missing(),
            };
            calls.insert(segment, call);
        }

        let verdict = self.resolver.resolve(&calls);
        debug!(
            sample = %sample.id,
            segments = sample.len(),
            verdict = %verdict,
            "Resolved sample"
        );

        SampleReport {
            sample_name: sample.id.clone(),
            verdict,
            calls,
        }
    }
}
