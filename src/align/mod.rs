//! Pairwise alignment onto fixed reference coordinates.
//!
//! Segment classifiers expect feature vectors of a fixed width, but raw
//! segment sequences arrive at arbitrary lengths. [`project_onto_reference`]
//! closes that gap: it aligns a query globally against the segment reference
//! and returns one query symbol per reference position, dropping query
//! insertions and padding query deletions with `-`.

pub mod pairwise;

pub use pairwise::{project_onto_reference, AlignError, MAX_QUERY_LEN};
