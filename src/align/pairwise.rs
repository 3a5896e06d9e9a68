//! Global pairwise alignment with affine gap penalties.
//!
//! The aligner exists for one purpose: projecting a query sequence onto the
//! coordinate frame of a fixed reference so that downstream feature encoding
//! always sees the same width. It is a textbook Needleman-Wunsch / Gotoh
//! three-state dynamic program, not a general alignment library.
//!
//! ## Scoring
//!
//! | Event | Score |
//! |-------|-------|
//! | Match | +1 |
//! | Mismatch | -1 |
//! | Gap (first base) | -4 |
//! | Gap (each additional base) | -1 |
//!
//! End gaps are penalized like any other gap. Symbols are compared
//! byte-for-byte, so an `N` against an `A` is an ordinary mismatch; callers
//! normalize case upstream.

use thiserror::Error;

/// Errors produced during alignment.
#[derive(Debug, Error)]
pub enum AlignError {
    /// One of the input sequences was empty.
    #[error("Cannot align an empty sequence")]
    EmptySequence,

    /// The query exceeds the supported length.
    #[error("Query of {len} bases exceeds the {max}-base alignment limit")]
    QueryTooLong { len: usize, max: usize },
}

/// Upper bound on query length, to keep the quadratic DP matrices bounded.
///
/// An influenza segment is under 3 kb; anything near this limit is not a
/// segment sequence and is rejected rather than aligned.
pub const MAX_QUERY_LEN: usize = 10_000;

const MATCH: i32 = 1;
const MISMATCH: i32 = -1;
const GAP_OPEN: i32 = -4;
const GAP_EXTEND: i32 = -1;

/// Sentinel for unreachable DP cells; half of `i32::MIN` so that adding a
/// penalty cannot wrap.
const NEG_INF: i32 = i32::MIN / 2;

/// Traceback state: which of the three DP matrices a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Diagonal: reference and query base aligned.
    Mat,
    /// Deletion: reference base aligned against a gap in the query.
    Del,
    /// Insertion: query base aligned against a gap in the reference.
    Ins,
}

/// Pick the best-scoring state, preferring diagonal, then deletion.
fn best_state(mat: i32, del: i32, ins: i32) -> State {
    if mat >= del && mat >= ins {
        State::Mat
    } else if del >= ins {
        State::Del
    } else {
        State::Ins
    }
}

/// Align `query` globally against `reference` and project it onto the
/// reference's coordinates.
///
/// Columns where the reference carries a gap (insertions in the query) are
/// dropped; reference positions the query does not cover come back as `-`.
/// The result therefore always has exactly `reference.len()` bytes.
///
/// When several alignments score equally, the traceback deterministically
/// prefers the diagonal move, then a reference-consuming gap.
///
/// # Errors
///
/// Returns [`AlignError::EmptySequence`] if either input is empty, and
/// [`AlignError::QueryTooLong`] if the query exceeds [`MAX_QUERY_LEN`].
pub fn project_onto_reference(reference: &[u8], query: &[u8]) -> Result<Vec<u8>, AlignError> {
    if reference.is_empty() || query.is_empty() {
        return Err(AlignError::EmptySequence);
    }
    if query.len() > MAX_QUERY_LEN {
        return Err(AlignError::QueryTooLong {
            len: query.len(),
            max: MAX_QUERY_LEN,
        });
    }

    let m = reference.len();
    let n = query.len();
    let w = n + 1;

    // Three full score matrices, row-major over (reference+1) x (query+1).
    let mut mat = vec![NEG_INF; (m + 1) * w];
    let mut del = vec![NEG_INF; (m + 1) * w];
    let mut ins = vec![NEG_INF; (m + 1) * w];

    mat[0] = 0;
    for i in 1..=m {
        del[i * w] = GAP_OPEN + (i as i32 - 1) * GAP_EXTEND;
    }
    for j in 1..=n {
        ins[j] = GAP_OPEN + (j as i32 - 1) * GAP_EXTEND;
    }

    for i in 1..=m {
        let row = i * w;
        let above = (i - 1) * w;
        for j in 1..=n {
            let sub = if reference[i - 1] == query[j - 1] {
                MATCH
            } else {
                MISMATCH
            };
            mat[row + j] = sub
                + mat[above + j - 1]
                    .max(del[above + j - 1])
                    .max(ins[above + j - 1]);
            del[row + j] = (mat[above + j] + GAP_OPEN)
                .max(del[above + j] + GAP_EXTEND)
                .max(ins[above + j] + GAP_OPEN);
            ins[row + j] = (mat[row + j - 1] + GAP_OPEN)
                .max(ins[row + j - 1] + GAP_EXTEND)
                .max(del[row + j - 1] + GAP_OPEN);
        }
    }

    // Traceback, building the projection back-to-front. Diagonal and
    // deletion steps each cover one reference position; insertion steps
    // consume query bases that have no reference column and emit nothing.
    let end = m * w + n;
    let mut state = best_state(mat[end], del[end], ins[end]);
    let mut projected = Vec::with_capacity(m);
    let (mut i, mut j) = (m, n);

    while i > 0 || j > 0 {
        match state {
            State::Mat => {
                projected.push(query[j - 1]);
                let p = (i - 1) * w + (j - 1);
                state = best_state(mat[p], del[p], ins[p]);
                i -= 1;
                j -= 1;
            }
            State::Del => {
                projected.push(b'-');
                let score = del[i * w + j];
                let p = (i - 1) * w + j;
                state = if score == mat[p] + GAP_OPEN {
                    State::Mat
                } else if score == del[p] + GAP_EXTEND {
                    State::Del
                } else {
                    State::Ins
                };
                i -= 1;
            }
            State::Ins => {
                let score = ins[i * w + j];
                let p = i * w + (j - 1);
                state = if score == mat[p] + GAP_OPEN {
                    State::Mat
                } else if score == ins[p] + GAP_EXTEND {
                    State::Ins
                } else {
                    State::Del
                };
                j -= 1;
            }
        }
    }

    projected.reverse();
    Ok(projected)
}
