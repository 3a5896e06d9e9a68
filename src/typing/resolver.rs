use std::collections::BTreeMap;
use tracing::debug;

use crate::catalog::{Composition, GenotypeTable};
use crate::core::{GenotypeVerdict, Segment, VersionCall};

/// Most candidates a "compatible with" note will enumerate; above this the
/// result is treated as too unconstrained to be meaningful.
pub const MAX_COMPATIBLE_GENS: usize = 3;

/// Reconciles per-segment version calls against the composition table.
pub struct GenotypeResolver<'a> {
    table: &'a GenotypeTable,
}

impl<'a> GenotypeResolver<'a> {
    pub fn new(table: &'a GenotypeTable) -> Self {
        Self { table }
    }

    /// Narrow the composition table down by the observed version calls and
    /// apply the multiplicity rules.
    ///
    /// Each call with a version (accepted or low confidence) keeps only the
    /// candidates expecting exactly that version for its segment; calls
    /// without a version impose no constraint. The verdict then depends on
    /// how many candidates survive and on whether any call raised the
    /// low-confidence flag:
    ///
    /// - exactly one candidate and no flag: that genotype, the only
    ///   success path
    /// - zero candidates: "unknown composition"
    /// - more than [`MAX_COMPATIBLE_GENS`]: "insufficient data", flag or not
    /// - anything else: a "compatible with ..." note listing the survivors
    ///   in table order
    #[must_use]
    pub fn resolve(&self, calls: &BTreeMap<Segment, VersionCall>) -> GenotypeVerdict {
        let low_confidence = calls.values().any(VersionCall::raises_flag);

        let mut candidates: Vec<&Composition> = self.table.iter().collect();
        for (&segment, call) in calls {
            let version = match call.version() {
                Some(version) => version,
                None => continue,
            };
            candidates.retain(|c| c.version(segment) == version);
            debug!(
                segment = %segment,
                version = %version,
                remaining = candidates.len(),
                "Applied composition constraint"
            );
        }

        match candidates.len() {
            0 => GenotypeVerdict::unassigned("unknown composition"),
            1 if !low_confidence => GenotypeVerdict::assigned(&candidates[0].name),
            n if n > MAX_COMPATIBLE_GENS => GenotypeVerdict::unassigned("insufficient data"),
            _ => {
                let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
                GenotypeVerdict::unassigned(format!("compatible with {}", names.join(", ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Composition;

    /// Four genotypes over a toy panel; G1/G2 differ only in NS, G4 shares
    /// nothing with the others.
    fn toy_table() -> GenotypeTable {
        let mut table = GenotypeTable::new();
        table.push(Composition::new("G1", ["1", "1", "1", "1", "20", "20", "1"]));
        table.push(Composition::new("G2", ["1", "1", "1", "1", "20", "20", "2"]));
        table.push(Composition::new("G3", ["2", "1", "1", "1", "20", "20", "1"]));
        table.push(Composition::new("G4", ["9", "9", "9", "9", "29", "29", "9"]));
        table
    }

    fn accepted(calls: &[(Segment, &str)]) -> BTreeMap<Segment, VersionCall> {
        calls
            .iter()
            .map(|(segment, version)| (*segment, VersionCall::accepted(*version, 0.9)))
            .collect()
    }

    #[test]
    fn test_unique_match_is_assigned() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);
        let calls = accepted(&[(Segment::Pb2, "1"), (Segment::Ns, "1")]);

        let verdict = resolver.resolve(&calls);
        assert_eq!(verdict.genotype(), Some("G1"));
        assert_eq!(verdict.note(), None);
    }

    #[test]
    fn test_no_candidates_is_unknown_composition() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);
        let calls = accepted(&[(Segment::Pb2, "1"), (Segment::Pb1, "9")]);

        let verdict = resolver.resolve(&calls);
        assert_eq!(verdict.genotype(), None);
        assert_eq!(verdict.note(), Some("unknown composition"));
    }

    #[test]
    fn test_too_many_candidates_is_insufficient_data() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);

        // No constraints at all: all four genotypes remain.
        let verdict = resolver.resolve(&BTreeMap::new());
        assert_eq!(verdict.note(), Some("insufficient data"));
    }

    #[test]
    fn test_ambiguous_candidates_are_listed_in_table_order() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);
        let calls = accepted(&[(Segment::Pb2, "1")]);

        let verdict = resolver.resolve(&calls);
        assert_eq!(verdict.genotype(), None);
        assert_eq!(verdict.note(), Some("compatible with G1, G2"));
    }

    #[test]
    fn test_unique_match_with_flag_is_compatible_not_assigned() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);

        let mut calls = accepted(&[(Segment::Ns, "1")]);
        calls.insert(Segment::Pb2, VersionCall::low_confidence("2", 0.5));

        let verdict = resolver.resolve(&calls);
        assert_eq!(verdict.genotype(), None);
        assert_eq!(verdict.note(), Some("compatible with G3"));
    }

    #[test]
    fn test_low_confidence_version_still_constrains() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);

        let mut calls = accepted(&[]);
        calls.insert(Segment::Pb2, VersionCall::low_confidence("9", 0.5));

        let verdict = resolver.resolve(&calls);
        assert_eq!(verdict.note(), Some("compatible with G4"));
    }

    #[test]
    fn test_unassigned_and_missing_impose_no_constraint() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);

        let mut calls = accepted(&[(Segment::Pb2, "1"), (Segment::Ns, "1")]);
        calls.insert(Segment::Pa, VersionCall::unassigned(0.2));
        calls.insert(Segment::Na, VersionCall::missing());

        // G1 is the only survivor, but unassigned/missing raise the flag.
        let verdict = resolver.resolve(&calls);
        assert_eq!(verdict.genotype(), None);
        assert_eq!(verdict.note(), Some("compatible with G1"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);
        let calls = accepted(&[(Segment::Pb2, "1")]);

        let first = resolver.resolve(&calls);
        let second = resolver.resolve(&calls);
        assert_eq!(first, second);
    }

    #[test]
    fn test_insufficient_data_wins_over_flag_state() {
        let table = toy_table();
        let resolver = GenotypeResolver::new(&table);

        // All candidates remain and a flag is raised; the count rule fires
        // first.
        let calls = BTreeMap::from([(Segment::Pb2, VersionCall::missing())]);
        let verdict = resolver.resolve(&calls);
        assert_eq!(verdict.note(), Some("insufficient data"));
    }
}
