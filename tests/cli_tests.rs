//! End-to-end tests for the geno-solver CLI.
//!
//! These drive the compiled binary over the FASTA fixtures in `tests/data`
//! and assert on complete report rows, so one pass covers the sample
//! reader, per-segment prediction, genotype resolution, and report
//! formatting against the embedded panel and composition table.

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER: &str = "Sample Name\tGenotype\tPB2\tPB1\tPA\tNP\tNA\tMP\tNS\tNotes";

fn geno_solver() -> Command {
    Command::cargo_bin("geno-solver").expect("binary should build")
}

fn stdout_lines(cmd: &mut Command) -> Vec<String> {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output)
        .expect("stdout should be UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_genotype_tsv_report() {
    let lines = stdout_lines(geno_solver().args(["genotype", "tests/data/samples.fa"]));

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], HEADER);

    // Full panel of accepted calls resolves to exactly one genotype.
    assert_eq!(
        lines[1],
        "A/duck/Italy/24VIR0001-3/2024\tEA-2020-A\t1\t1\t1\t1\t20\t20\t1\t"
    );

    // A missing NS leaves two candidates differing only in NS.
    assert_eq!(
        lines[2],
        "A/chicken/Netherlands/24VIR0202-1/2024\t[unassigned]\t7\t1\t6\t5\t23\t20\t?\t\
         Genotype: compatible with EA-2022-BB, EA-2022-BC; NS: missing"
    );

    // A version combination absent from the composition table.
    assert_eq!(
        lines[3],
        "A/turkey/Hungary/24VIR0303-2/2024\t[unassigned]\t5\t5\t?\t?\t?\t20\t?\t\
         Genotype: unknown composition; PA: missing; NP: unassigned; NA: missing; NS: missing"
    );

    // A single segment constrains too little to say anything.
    assert_eq!(
        lines[4],
        "A/mallard/Denmark/24VIR0404-1/2024\t[unassigned]\t?\t?\t?\t?\t20\t20\t?\t\
         Genotype: insufficient data; PB2: missing; PB1: missing; PA: missing; NP: missing; NS: missing"
    );

    // One low-confidence call blocks assignment even with a unique match.
    assert_eq!(
        lines[5],
        "A/gull/Italy/24VIR0505-5/2024\t[unassigned]\t1*\t1\t1\t1\t20\t20\t1\t\
         Genotype: compatible with EA-2020-A; PB2: low confidence"
    );
}

#[test]
fn test_genotype_reads_gzipped_input() {
    let lines = stdout_lines(geno_solver().args(["genotype", "tests/data/single.fa.gz"]));

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], HEADER);
    assert_eq!(
        lines[1],
        "A/duck/Italy/24VIR0001-3/2024\tEA-2020-A\t1\t1\t1\t1\t20\t20\t1\t"
    );
}

#[test]
fn test_genotype_tolerates_odd_headers() {
    // The fixture opens with an unparseable record name, then a sample
    // whose only record has an unknown segment suffix, then a sample with
    // an HA record and a duplicated NS record.
    let lines = stdout_lines(geno_solver().args(["genotype", "tests/data/odd_headers.fa"]));

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "A/odd/Germany/24VIR0666-1/2024\t[unassigned]\t?\t?\t?\t?\t?\t20\t?\t\
         Genotype: insufficient data; PB2: missing; PB1: missing; PA: missing; NP: missing; NA: missing; NS: missing"
    );
    assert_eq!(
        lines[2],
        "A/odd/Germany/24VIR0777-1/2024\tEA-2020-A\t1\t1\t1\t1\t20\t20\t1\t"
    );
}

#[test]
fn test_warnings_go_to_stderr_not_stdout() {
    // Records with bad headers trigger warnings; those must never land in
    // the report stream.
    let assert = geno_solver()
        .args(["genotype", "tests/data/odd_headers.fa"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unrecognized segment suffix"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout is UTF-8");
    assert_eq!(stdout.lines().count(), 3);
    assert!(!stdout.contains("WARN"), "log lines leaked into the report");
}

#[test]
fn test_json_report_stays_parseable_despite_warnings() {
    let output = geno_solver()
        .args(["genotype", "tests/data/odd_headers.fa", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let records: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout should be JSON");
    assert_eq!(records.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_genotype_writes_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_path = dir.path().join("report.tsv");

    geno_solver()
        .args(["genotype", "tests/data/single.fa.gz", "-o"])
        .arg(&out_path)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out_path).expect("output file readable");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].starts_with("A/duck/Italy/24VIR0001-3/2024\tEA-2020-A"));
}

#[test]
fn test_genotype_json_report() {
    let output = geno_solver()
        .args(["genotype", "tests/data/samples.fa", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let records: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout should be JSON");
    let records = records.as_array().expect("top level should be an array");
    assert_eq!(records.len(), 5);

    assert_eq!(records[0]["sample_name"], "A/duck/Italy/24VIR0001-3/2024");
    assert_eq!(records[0]["genotype"], "EA-2020-A");
    assert_eq!(records[0]["notes"], "");
    assert_eq!(records[0]["versions"]["MP"], "20");
    assert_eq!(records[0]["versions"]["PB2"], "1");

    // The gull sample carries the raw call detail for its low-confidence PB2.
    assert_eq!(records[4]["genotype"], "[unassigned]");
    assert_eq!(records[4]["versions"]["PB2"], "1*");
    assert_eq!(records[4]["calls"]["PB2"]["version"], "1");
    assert_eq!(records[4]["calls"]["PB2"]["confidence"], "low_confidence");
}

#[test]
fn test_genotype_verbose_reports_counts() {
    geno_solver()
        .args(["genotype", "tests/data/samples.fa", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Processed 5 samples (22 sequences)"));
}

#[test]
fn test_genotype_missing_input_fails() {
    geno_solver()
        .args(["genotype", "tests/data/does_not_exist.fa"])
        .assert()
        .failure();
}

#[test]
fn test_genotype_references_requires_models() {
    geno_solver()
        .args([
            "genotype",
            "tests/data/samples.fa",
            "--references",
            "data/references.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--models"));
}

#[test]
fn test_genotype_with_explicit_data_files() {
    // Pointing at the shipped data files must match the embedded panel.
    let lines = stdout_lines(geno_solver().args([
        "genotype",
        "tests/data/single.fa.gz",
        "--references",
        "data/references.json",
        "--models",
        "data/models.json",
        "--compositions",
        "data/compositions.tsv",
    ]));

    assert_eq!(
        lines[1],
        "A/duck/Italy/24VIR0001-3/2024\tEA-2020-A\t1\t1\t1\t1\t20\t20\t1\t"
    );
}

#[test]
fn test_panel_list() {
    let lines = stdout_lines(geno_solver().args(["panel", "list"]));

    // Header plus one row per genotype in the embedded table.
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0], "Genotype\tPB2\tPB1\tPA\tNP\tNA\tMP\tNS");
    assert_eq!(lines[1], "EA-2020-A\t1\t1\t1\t1\t20\t20\t1");
    assert_eq!(lines[13], "EA-2022-BB\t7\t1\t6\t5\t23\t20\t1");
}

#[test]
fn test_panel_show() {
    let lines = stdout_lines(geno_solver().args(["panel", "show", "EA-2022-BB"]));

    assert_eq!(lines[0], "Segment\tVersion");
    assert!(lines.contains(&"PB2\t7".to_string()));
    assert!(lines.contains(&"NA\t23".to_string()));
    assert!(lines.contains(&"MP\t20".to_string()));
}

#[test]
fn test_panel_show_unknown_genotype_fails() {
    geno_solver()
        .args(["panel", "show", "EA-1999-ZZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_panel_refs() {
    let lines = stdout_lines(geno_solver().args(["panel", "refs"]));

    assert_eq!(lines[0], "Segment\tMode\tReference Length\tVersions");
    assert!(lines.contains(&"PB2\tpredicted\t2279\t1,2,3,4,5,7".to_string()));
    assert!(lines.contains(&"MP\tfixed\t-\t20".to_string()));
}

#[test]
fn test_panel_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_path = dir.path().join("panel.json");

    geno_solver()
        .args(["panel", "export"])
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported reference panel"));

    let written = std::fs::read_to_string(&out_path).expect("export readable");
    let data: serde_json::Value = serde_json::from_str(&written).expect("export is JSON");
    assert_eq!(data["version"], "1.0.0");
    assert_eq!(data["references"].as_object().map(|m| m.len()), Some(6));
    assert_eq!(data["fixed_versions"]["MP"], "20");
}
