//! Core data types for influenza genotype assignment.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Segment`]: The seven internal gene segments, in report column order
//! - [`Sample`]: One isolate's segment sequences, grouped from FASTA input
//! - [`VersionCall`], [`CallConfidence`]: Per-segment classification results
//! - [`GenotypeVerdict`]: The terminal genotype decision for one sample
//!
//! ## Version Labels
//!
//! Segment versions are short opaque labels (`"1"`, `"20"`, ...). A
//! low-confidence call is displayed as `<label>*`, but the stored label is
//! always bare so it can be matched against the composition table directly.

pub mod call;
pub mod sample;
pub mod segment;

pub use call::{CallConfidence, GenotypeVerdict, VersionCall, UNASSIGNED_LABEL};
pub use sample::Sample;
pub use segment::{Segment, SegmentParseError};
