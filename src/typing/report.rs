use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::ReferencePanel;
use crate::core::{Segment, VersionCall};
use crate::typing::pipeline::SampleReport;

/// Header line for TSV output.
#[must_use]
pub fn tsv_header() -> String {
    let mut fields = vec!["Sample Name".to_string(), "Genotype".to_string()];
    fields.extend(Segment::ALL.iter().map(|s| s.name().to_string()));
    fields.push("Notes".to_string());
    fields.join("\t")
}

/// One TSV row for a sample report, without a trailing newline.
///
/// Columns are the sample name, the genotype verdict, each segment's
/// displayed version in report column order, and the combined notes. The
/// notes field may be empty, leaving the row ending in a tab.
#[must_use]
pub fn tsv_row(report: &SampleReport, panel: &ReferencePanel) -> String {
    let mut fields = vec![report.sample_name.clone(), report.verdict.to_string()];
    for segment in Segment::ALL {
        fields.push(display_version(report, panel, segment));
    }
    fields.push(combined_notes(report));
    fields.join("\t")
}

/// One sample report in JSON form.
#[derive(Debug, Serialize)]
pub struct JsonRecord {
    pub sample_name: String,
    pub genotype: String,
    pub notes: String,
    /// Displayed version per segment, fixed segments included.
    pub versions: BTreeMap<Segment, String>,
    /// Raw calls with probabilities, predicted segments only.
    pub calls: BTreeMap<Segment, VersionCall>,
}

/// Build the JSON record for a sample report.
#[must_use]
pub fn json_record(report: &SampleReport, panel: &ReferencePanel) -> JsonRecord {
    let versions = Segment::ALL
        .into_iter()
        .map(|segment| (segment, display_version(report, panel, segment)))
        .collect();
    JsonRecord {
        sample_name: report.sample_name.clone(),
        genotype: report.verdict.to_string(),
        notes: combined_notes(report),
        versions,
        calls: report.calls.clone(),
    }
}

/// The version shown for a segment: the panel's fixed value when the
/// segment is not predicted, otherwise the call's display form.
fn display_version(report: &SampleReport, panel: &ReferencePanel, segment: Segment) -> String {
    if let Some(fixed) = panel.fixed_version(segment) {
        return fixed.to_string();
    }
    report
        .calls
        .get(&segment)
        .map(|call| call.to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// The combined note column: the genotype note first, then per-segment
/// notes in report column order, joined by "; ".
fn combined_notes(report: &SampleReport) -> String {
    let mut notes = Vec::new();
    if let Some(note) = report.verdict.note() {
        notes.push(format!("Genotype: {note}"));
    }
    for (segment, call) in &report.calls {
        if let Some(note) = call.note() {
            notes.push(format!("{segment}: {note}"));
        }
    }
    notes.join("; ")
}
