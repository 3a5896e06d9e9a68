//! # geno-solver
//!
//! A library for assigning genotypes to clade 2.3.4.4b A(H5N1) influenza
//! samples from their internal gene segments.
//!
//! European H5N1 surveillance names genotypes by the combination of segment
//! versions a virus carries: the same genotype label always means the same
//! PB2, PB1, PA, NP, NA, MP, and NS lineages. `geno-solver` recovers that
//! label from raw segment sequences, and explains itself when it cannot.
//!
//! Each submitted segment is aligned against a fixed reference for its
//! segment, the aligned sequence is one-hot encoded, and a per-segment
//! classifier turns the encoding into a probability distribution over known
//! segment versions. The per-segment calls are then resolved against a table
//! of known genotype compositions: exactly one surviving candidate yields a
//! genotype, anything else yields an explanatory note.
//!
//! ## Features
//!
//! - **Reference-projected alignment**: Global alignment with affine gaps
//!   projects every query onto its segment reference
//! - **Per-segment version calls**: Probability-backed calls with accepted,
//!   low-confidence, and unassigned outcomes
//! - **Composition resolution**: Combines segment calls into a genotype
//!   verdict against the known composition table
//! - **Degraded-input tolerance**: Missing or unrecognizable segments
//!   degrade the verdict, never the run
//!
//! ## Example
//!
//! ```rust,no_run
//! use geno_solver::{GenotypeTable, ReferencePanel, Sample, SamplePipeline, Segment};
//!
//! // Load the embedded panel and composition table
//! let panel = ReferencePanel::load_embedded().unwrap();
//! let table = GenotypeTable::load_embedded().unwrap();
//!
//! // Genotype a sample from its segment sequences
//! let mut sample = Sample::new("A/duck/Italy/24VIR0001-3/2024");
//! sample.insert_sequence(Segment::Pb2, "AGCGAAAGCAGG...".to_string());
//!
//! let pipeline = SamplePipeline::new(&panel, &table);
//! let report = pipeline.genotype_sample(&sample);
//! println!("{}: {}", report.sample_name, report.verdict);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for segments, samples, and calls
//! - [`align`]: Pairwise alignment and reference projection
//! - [`model`]: Sequence encoding and version classifiers
//! - [`catalog`]: Reference panel and genotype composition table
//! - [`typing`]: Per-segment prediction and genotype resolution
//! - [`parsing`]: FASTA sample reader
//! - [`cli`]: Command-line interface implementation

pub mod align;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod model;
pub mod parsing;
pub mod typing;

// Re-export commonly used types for convenience
pub use catalog::{GenotypeTable, ReferencePanel};
pub use core::{CallConfidence, GenotypeVerdict, Sample, Segment, VersionCall};
pub use model::VersionClassifier;
pub use typing::{SamplePipeline, SampleReport};
