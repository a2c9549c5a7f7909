//! Bit-level nucleotide codes.
//!
//! Each IUPAC symbol maps to one byte whose upper nibble is its nucleotide
//! set, so two codes can share a base only if their AND keeps an upper-nibble bit.

use std::fmt;

use thiserror::Error;

/// Bit set on every code that denotes exactly one of A, C, G or T.
pub const UNAMBIGUOUS_BIT: u8 = 0b0000_1000;

/// Codes whose bitwise AND falls below this value share no nucleotide.
const DISJOINT_LIMIT: u8 = 16;

const INVALID: u8 = 0;

/// Symbol to code lookup. The upper nibble is the nucleotide set
/// (A = 128, G = 64, C = 32, T = 16), bit 3 marks an unambiguous base and the
/// low bits separate gap and unknown from `N`.
const ENCODING: [u8; 256] = build_encoding();

/// Code to uppercase symbol lookup, the inverse of [`ENCODING`].
const DECODING: [u8; 256] = build_decoding();

const SYMBOLS: [(u8, u8); 17] = [
    (b'A', 136),
    (b'G', 72),
    (b'C', 40),
    (b'T', 24),
    (b'R', 192),
    (b'M', 160),
    (b'W', 144),
    (b'S', 96),
    (b'K', 80),
    (b'Y', 48),
    (b'V', 224),
    (b'H', 176),
    (b'D', 208),
    (b'B', 112),
    (b'N', 240),
    (b'-', 244),
    (b'?', 242),
];

const fn build_encoding() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < SYMBOLS.len() {
        let (symbol, code) = SYMBOLS[i];
        table[symbol as usize] = code;
        table[symbol.to_ascii_lowercase() as usize] = code;
        i += 1;
    }
    table
}

const fn build_decoding() -> [u8; 256] {
    let mut table = [b'?'; 256];
    let mut i = 0;
    while i < SYMBOLS.len() {
        let (symbol, code) = SYMBOLS[i];
        table[code as usize] = symbol;
        i += 1;
    }
    table
}

/// Errors raised while encoding nucleotide symbols.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Encountered a byte outside the IUPAC, gap and unknown alphabet.
    #[error("unrecognized nucleotide '{symbol}' at position {position}")]
    UnrecognizedSymbol {
        /// Offending symbol.
        symbol: char,
        /// 1-based alignment column.
        position: usize,
    },
}

/// Encode a single IUPAC symbol (either case).
#[inline]
pub fn encode(symbol: u8) -> Option<u8> {
    match ENCODING[symbol as usize] {
        INVALID => None,
        code => Some(code),
    }
}

/// Uppercase symbol for a code produced by [`encode`].
#[inline]
pub fn decode(code: u8) -> u8 {
    DECODING[code as usize]
}

/// `true` when the two codes cannot denote the same nucleotide.
#[inline]
pub fn is_different(a: u8, b: u8) -> bool {
    a & b < DISJOINT_LIMIT
}

/// `true` when `a` is an unambiguous base identical to `b`.
#[inline]
pub fn is_confident_match(a: u8, b: u8) -> bool {
    a & UNAMBIGUOUS_BIT == UNAMBIGUOUS_BIT && a == b
}

/// `true` when the code denotes exactly one of A, C, G or T.
#[inline]
pub fn is_unambiguous(code: u8) -> bool {
    code & UNAMBIGUOUS_BIT == UNAMBIGUOUS_BIT
}

/// Alignment row encoded one byte per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSequence {
    codes: Vec<u8>,
}

impl EncodedSequence {
    /// Encode an ASCII alignment row.
    pub fn encode(sequence: &[u8]) -> Result<Self, CodecError> {
        let codes = sequence
            .iter()
            .enumerate()
            .map(|(idx, &symbol)| {
                encode(symbol).ok_or(CodecError::UnrecognizedSymbol {
                    symbol: symbol as char,
                    position: idx + 1,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { codes })
    }

    /// Alignment width.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` for a zero-width row.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Raw codes.
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Number of columns that are not an unambiguous base.
    pub fn ambiguous_sites(&self) -> usize {
        self.codes.iter().filter(|&&code| !is_unambiguous(code)).count()
    }
}

impl fmt::Display for EncodedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decoded: Vec<u8> = self.codes.iter().map(|&code| decode(code)).collect();
        write!(f, "{}", String::from_utf8_lossy(&decoded))
    }
}
