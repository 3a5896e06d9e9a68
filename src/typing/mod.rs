//! Segment version prediction and genotype resolution.
//!
//! This module provides the genotyping engine:
//!
//! - [`SegmentPredictor`]: aligns, encodes, and classifies one segment
//! - [`GenotypeResolver`]: reconciles calls against the composition table
//! - [`SamplePipeline`]: drives both across every segment of a sample
//! - [`report`]: TSV and JSON rendering of sample reports
//!
//! ## Confidence Gating
//!
//! Each predicted segment yields a probability `p` for its best version,
//! gated into three states:
//!
//! | Condition | State | Displayed |
//! |-----------|-------|-----------|
//! | `p > 0.6` | accepted | `1` |
//! | `0.4 <= p <= 0.6` | low confidence | `1*` |
//! | `p < 0.4` | unassigned | `?` |
//!
//! Any state except accepted raises the sample's low-confidence flag, which
//! blocks the unique-genotype success path in the resolver.
//!
//! ## Example
//!
//! ```rust,no_run
//! use geno_solver::{GenotypeTable, ReferencePanel, Sample, SamplePipeline};
//! use geno_solver::core::Segment;
//!
//! let panel = ReferencePanel::load_embedded().unwrap();
//! let table = GenotypeTable::load_embedded().unwrap();
//!
//! let mut sample = Sample::new("A/duck/Italy/24VIR0001-3/2024");
//! sample.insert_sequence(Segment::Pb2, "ATGGAGAGAATAAAAGAGCTAAGA".to_string());
//!
//! let pipeline = SamplePipeline::new(&panel, &table);
//! let report = pipeline.genotype_sample(&sample);
//! println!("{}: {}", report.sample_name, report.verdict);
//! ```

pub mod pipeline;
pub mod predictor;
pub mod report;
pub mod resolver;

pub use pipeline::{SamplePipeline, SampleReport};
pub use predictor::{SegmentPredictor, MIN_VPROB_THR, VPROB_THR};
pub use resolver::{GenotypeResolver, MAX_COMPATIBLE_GENS};
