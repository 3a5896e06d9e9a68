//! 4-bit nucleotide feature encoding.
//!
//! Each symbol of a coordinate-projected sequence becomes four booleans, one
//! per nucleotide axis in the fixed order A, C, G, T. Unambiguous bases set a
//! single bit; IUPAC ambiguity codes set the union of the bases they stand
//! for; `U` encodes like `T`.
//!
//! | Symbols | Bits set |
//! |---------|----------|
//! | A / C / G / T / U | one of A, C, G, T |
//! | R / Y / S / W / K / M | the two bases of the pair |
//! | B / D / H / V | the three bases of the triple |
//! | N | all four |
//! | Z / `-` | none |
//!
//! `Z` (zero, "no base") and the gap are the only symbols that legitimately
//! encode to all-zero. Anything outside the table above is an error, never a
//! silent zero-fill. Input is expected uppercased; callers normalize case
//! upstream.

use thiserror::Error;

/// Booleans produced per input symbol.
pub const ENCODING_WIDTH: usize = 4;

/// Errors produced during feature encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The sequence contained a symbol outside the supported alphabet.
    #[error("Unsupported symbol '{symbol}' at position {position}")]
    UnsupportedSymbol { symbol: char, position: usize },
}

/// Bit mask over the A, C, G, T axes for one symbol, highest bit = A.
fn symbol_mask(symbol: u8) -> Option<u8> {
    let mask = match symbol {
        b'A' => 0b1000,
        b'C' => 0b0100,
        b'G' => 0b0010,
        b'T' | b'U' => 0b0001,
        b'W' => 0b1001,
        b'S' => 0b0110,
        b'M' => 0b1100,
        b'K' => 0b0011,
        b'R' => 0b1010,
        b'Y' => 0b0101,
        b'B' => 0b0111,
        b'D' => 0b1011,
        b'H' => 0b1101,
        b'V' => 0b1110,
        b'N' => 0b1111,
        b'Z' | b'-' => 0b0000,
        _ => return None,
    };
    Some(mask)
}

/// Encode a nucleotide sequence into a flat feature vector of
/// `ENCODING_WIDTH * seq.len()` booleans.
///
/// # Errors
///
/// Returns [`EncodeError::UnsupportedSymbol`] at the first symbol outside
/// the supported alphabet.
pub fn encode(seq: &[u8]) -> Result<Vec<bool>, EncodeError> {
    let mut features = Vec::with_capacity(seq.len() * ENCODING_WIDTH);
    for (position, &symbol) in seq.iter().enumerate() {
        let mask = symbol_mask(symbol).ok_or(EncodeError::UnsupportedSymbol {
            symbol: symbol as char,
            position,
        })?;
        features.push(mask & 0b1000 != 0);
        features.push(mask & 0b0100 != 0);
        features.push(mask & 0b0010 != 0);
        features.push(mask & 0b0001 != 0);
    }
    Ok(features)
}
