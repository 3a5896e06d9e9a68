//! Input parsing for segmented FASTA files.
//!
//! Input files carry one record per sequenced segment, with the segment
//! name appended to the sample name after an underscore. The reader
//! groups consecutive records back into per-sample bundles:
//!
//! ```text
//! >A/duck/Italy/24VIR0001-3/2024_PB2
//! AGCGAAAGCAGG...
//! >A/duck/Italy/24VIR0001-3/2024_NS
//! AGCAAAAGCAGG...
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use geno_solver::parsing::fasta::SampleReader;
//! use std::path::Path;
//!
//! let reader = SampleReader::from_path(Path::new("sequences.fa")).unwrap();
//! for sample in reader {
//!     let sample = sample.unwrap();
//!     println!("{}: {} segments", sample.id, sample.len());
//! }
//! ```

pub mod fasta;

pub use fasta::{FastaError, SampleReader};
