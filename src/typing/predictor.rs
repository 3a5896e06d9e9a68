use tracing::{debug, warn};

use crate::align::project_onto_reference;
use crate::catalog::ReferencePanel;
use crate::core::{Segment, VersionCall};
use crate::model::encoding::encode;

/// Probability below which a version call is rejected outright.
pub const MIN_VPROB_THR: f64 = 0.4;

/// Probability above which a version call is accepted without a flag.
///
/// Probabilities falling on either threshold land in the low-confidence
/// band, so the accepting comparison is strict.
pub const VPROB_THR: f64 = 0.6;

/// Calls segment versions by aligning, encoding, and classifying one raw
/// sequence at a time.
pub struct SegmentPredictor<'a> {
    panel: &'a ReferencePanel,
}

impl<'a> SegmentPredictor<'a> {
    pub fn new(panel: &'a ReferencePanel) -> Self {
        Self { panel }
    }

    /// Predict the version of one segment sequence.
    ///
    /// Never fails: any per-segment problem (alignment error, unsupported
    /// symbol, unusable distribution) degrades to an unassigned call so the
    /// rest of the sample still gets processed.
    pub fn predict(&self, segment: Segment, raw_sequence: &str) -> VersionCall {
        let (reference, classifier) = match (
            self.panel.reference(segment),
            self.panel.classifier(segment),
        ) {
            (Some(reference), Some(classifier)) => (reference, classifier),
            _ => {
                warn!(segment = %segment, "Segment is not predicted by the panel");
                return VersionCall::unassigned(0.0);
            }
        };

        let projected =
            match project_onto_reference(reference.as_bytes(), raw_sequence.as_bytes()) {
                Ok(projected) => projected,
                Err(e) => {
                    warn!(segment = %segment, error = %e, "Alignment failed, leaving segment unassigned");
                    return VersionCall::unassigned(0.0);
                }
            };

        let features = match encode(&projected) {
            Ok(features) => features,
            Err(e) => {
                warn!(segment = %segment, error = %e, "Encoding failed, leaving segment unassigned");
                return VersionCall::unassigned(0.0);
            }
        };

        let distribution = classifier.predict_distribution(&features);
        let Some((version, probability)) = best_label(classifier.labels(), &distribution) else {
            warn!(segment = %segment, "Classifier returned no usable distribution");
            return VersionCall::unassigned(0.0);
        };

        debug!(
            segment = %segment,
            version = %version,
            probability,
            "Classified segment"
        );

        if probability < MIN_VPROB_THR {
            VersionCall::unassigned(probability)
        } else if probability <= VPROB_THR {
            VersionCall::low_confidence(version, probability)
        } else {
            VersionCall::accepted(version, probability)
        }
    }
}

/// Pick the winning label: strictly greatest probability, first seen wins
/// on ties. An empty or all-zero distribution has no winner.
fn best_label<'l>(labels: &'l [String], distribution: &[f64]) -> Option<(&'l str, f64)> {
    let mut best: Option<(&'l str, f64)> = None;
    let mut best_p = 0.0;
    for (label, &p) in labels.iter().zip(distribution) {
        if p > best_p {
            best = Some((label, p));
            best_p = p;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CallConfidence;
    use crate::model::VersionClassifier;
    use std::collections::BTreeMap;

    /// Classifier returning a canned distribution, for exercising the
    /// threshold logic with exact probabilities.
    struct FixedClassifier {
        labels: Vec<String>,
        distribution: Vec<f64>,
        feature_len: usize,
    }

    impl VersionClassifier for FixedClassifier {
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
            self.distribution.clone()
        }
    }

    fn panel_with_distribution(distribution: Vec<f64>) -> ReferencePanel {
        let reference = "ACGTACGT";
        let labels = ["v1", "v2", "v3"];
        let references = BTreeMap::from([(Segment::Pb2, reference.to_string())]);
        let classifiers: BTreeMap<Segment, Box<dyn VersionClassifier>> = BTreeMap::from([(
            Segment::Pb2,
            Box::new(FixedClassifier {
                labels: labels.iter().map(|s| s.to_string()).collect(),
                distribution,
                feature_len: reference.len() * 4,
            }) as Box<dyn VersionClassifier>,
        )]);
        let fixed: BTreeMap<Segment, String> = Segment::ALL
            .into_iter()
            .filter(|s| *s != Segment::Pb2)
            .map(|s| (s, "x".to_string()))
            .collect();
        ReferencePanel::new(references, classifiers, fixed).unwrap()
    }

    #[test]
    fn test_accepted_above_upper_threshold() {
        let panel = panel_with_distribution(vec![0.7, 0.2, 0.1]);
        let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "ACGTACGT");
        assert_eq!(call.confidence(), CallConfidence::Accepted);
        assert_eq!(call.version(), Some("v1"));
        assert!((call.probability() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_low_confidence_band() {
        let panel = panel_with_distribution(vec![0.5, 0.3, 0.2]);
        let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "ACGTACGT");
        assert_eq!(call.confidence(), CallConfidence::LowConfidence);
        assert_eq!(call.version(), Some("v1"));
        assert_eq!(call.to_string(), "v1*");
    }

    #[test]
    fn test_rejected_below_lower_threshold() {
        let panel = panel_with_distribution(vec![0.3, 0.3, 0.3]);
        let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "ACGTACGT");
        assert_eq!(call.confidence(), CallConfidence::Unassigned);
        assert_eq!(call.version(), None);
    }

    #[test]
    fn test_thresholds_are_inclusive_on_both_edges() {
        // Exactly 0.4 and exactly 0.6 both land in the low-confidence band.
        for p in [MIN_VPROB_THR, VPROB_THR] {
            let panel = panel_with_distribution(vec![p, 0.1, 0.1]);
            let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "ACGTACGT");
            assert_eq!(call.confidence(), CallConfidence::LowConfidence, "p = {p}");
        }
    }

    #[test]
    fn test_threshold_states_are_monotonic() {
        let states: Vec<CallConfidence> = [0.3, 0.5, 0.7]
            .into_iter()
            .map(|p| {
                let panel = panel_with_distribution(vec![p, 0.0, 0.0]);
                SegmentPredictor::new(&panel)
                    .predict(Segment::Pb2, "ACGTACGT")
                    .confidence()
            })
            .collect();
        assert_eq!(
            states,
            [
                CallConfidence::Unassigned,
                CallConfidence::LowConfidence,
                CallConfidence::Accepted
            ]
        );
    }

    #[test]
    fn test_tie_goes_to_first_label() {
        let panel = panel_with_distribution(vec![0.45, 0.45, 0.1]);
        let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "ACGTACGT");
        assert_eq!(call.version(), Some("v1"));
    }

    #[test]
    fn test_empty_sequence_degrades_to_unassigned() {
        let panel = panel_with_distribution(vec![0.9, 0.05, 0.05]);
        let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "");
        assert_eq!(call.confidence(), CallConfidence::Unassigned);
        assert_eq!(call.probability(), 0.0);
    }

    #[test]
    fn test_unsupported_symbol_degrades_to_unassigned() {
        // 'X' survives alignment as a mismatch, then fails encoding.
        let panel = panel_with_distribution(vec![0.9, 0.05, 0.05]);
        let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "ACGTXCGT");
        assert_eq!(call.confidence(), CallConfidence::Unassigned);
        assert_eq!(call.probability(), 0.0);
    }

    #[test]
    fn test_all_zero_distribution_degrades_to_unassigned() {
        let panel = panel_with_distribution(vec![0.0, 0.0, 0.0]);
        let call = SegmentPredictor::new(&panel).predict(Segment::Pb2, "ACGTACGT");
        assert_eq!(call.confidence(), CallConfidence::Unassigned);
    }

    #[test]
    fn test_best_label_first_seen_wins() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(best_label(&labels, &[0.2, 0.6, 0.2]), Some(("b", 0.6)));
        assert_eq!(best_label(&labels, &[0.4, 0.4, 0.2]), Some(("a", 0.4)));
        assert_eq!(best_label(&labels, &[]), None);
        assert_eq!(best_label(&labels, &[0.0, 0.0, 0.0]), None);
    }
}
