use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::nucleotide::{decode, is_different, is_unambiguous};
use super::{EncodedSequence, SequenceRecord};

/// Errors raised while profiling a sequence against the reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// The sequence and the reference are not the same alignment width.
    #[error("sequence '{id}' has width {found}, reference has width {expected}")]
    WidthMismatch {
        /// Identifier of the offending sequence.
        id: String,
        /// Reference width.
        expected: usize,
        /// Sequence width.
        found: usize,
    },
}

/// Single-nucleotide difference against the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnpEntry {
    /// 1-based alignment column.
    pub position: u32,
    /// Reference symbol (uppercase ASCII).
    pub reference: u8,
    /// Sequence symbol (uppercase ASCII).
    pub alternate: u8,
}

impl fmt::Display for SnpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.reference as char, self.position, self.alternate as char
        )
    }
}

/// Inclusive 1-based run of columns that are not A, C, G or T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmbiguityTract {
    /// First ambiguous column.
    pub start: u32,
    /// Last ambiguous column.
    pub stop: u32,
}

impl AmbiguityTract {
    /// Construct a tract; `stop` must not precede `start`.
    pub fn new(start: u32, stop: u32) -> Self {
        debug_assert!(start <= stop, "tract {start}-{stop} is reversed");
        Self { start, stop }
    }

    /// Number of columns covered.
    pub fn width(&self) -> u32 {
        self.stop - self.start + 1
    }

    /// Whether `position` falls inside the tract.
    pub fn contains(&self, position: u32) -> bool {
        self.start <= position && position <= self.stop
    }
}

impl fmt::Display for AmbiguityTract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.stop {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.stop)
        }
    }
}

/// Compact description of one sequence relative to the reference.
///
/// Profiles are built once, never mutated, and shared between every pairwise
/// comparison through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceProfile {
    id: Arc<str>,
    index: usize,
    snps: Vec<SnpEntry>,
    snp_positions: Vec<u32>,
    ambiguities: Vec<AmbiguityTract>,
    ambiguity_count: u32,
}

impl SequenceProfile {
    /// Assemble a profile from already-known parts (e.g. a parsed listing row).
    ///
    /// SNPs and tracts must be sorted by position.
    pub fn new(
        id: impl Into<Arc<str>>,
        index: usize,
        snps: Vec<SnpEntry>,
        ambiguities: Vec<AmbiguityTract>,
        ambiguity_count: u32,
    ) -> Self {
        debug_assert!(snps.windows(2).all(|w| w[0].position < w[1].position));
        debug_assert!(ambiguities.windows(2).all(|w| w[0].stop < w[1].start));
        let snp_positions = snps.iter().map(|snp| snp.position).collect();
        Self {
            id: id.into(),
            index,
            snps,
            snp_positions,
            ambiguities,
            ambiguity_count,
        }
    }

    /// Profile `record` against `reference` in a single left-to-right scan.
    pub fn extract(
        reference: &EncodedSequence,
        record: &SequenceRecord,
    ) -> Result<Self, ProfileError> {
        if reference.len() != record.len() {
            return Err(ProfileError::WidthMismatch {
                id: record.id.to_string(),
                expected: reference.len(),
                found: record.len(),
            });
        }

        let mut snps = Vec::new();
        let mut ambiguities = Vec::new();
        let mut ambiguity_count = 0u32;
        let mut open_tract: Option<u32> = None;

        let columns = reference.codes().iter().zip(record.sequence.codes());
        for (column, (&ref_code, &code)) in (1u32..).zip(columns) {
            if is_unambiguous(code) {
                if let Some(start) = open_tract.take() {
                    ambiguities.push(AmbiguityTract::new(start, column - 1));
                }
                if is_different(ref_code, code) {
                    snps.push(SnpEntry {
                        position: column,
                        reference: decode(ref_code),
                        alternate: decode(code),
                    });
                }
            } else {
                ambiguity_count += 1;
                open_tract.get_or_insert(column);
            }
        }
        if let Some(start) = open_tract {
            ambiguities.push(AmbiguityTract::new(start, record.len() as u32));
        }

        Ok(Self::new(
            Arc::clone(&record.id),
            record.index,
            snps,
            ambiguities,
            ambiguity_count,
        ))
    }

    /// Sequence identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Shared handle to the identifier.
    pub fn shared_id(&self) -> Arc<str> {
        Arc::clone(&self.id)
    }

    /// 0-based ordinal in the input stream.
    pub fn index(&self) -> usize {
        self.index
    }

    /// SNPs ordered by position.
    pub fn snps(&self) -> &[SnpEntry] {
        &self.snps
    }

    /// Positions of [`Self::snps`], in the same order.
    pub fn snp_positions(&self) -> &[u32] {
        &self.snp_positions
    }

    /// Ambiguity tracts ordered by position.
    pub fn ambiguities(&self) -> &[AmbiguityTract] {
        &self.ambiguities
    }

    /// Number of SNPs.
    pub fn snp_count(&self) -> usize {
        self.snps.len()
    }

    /// Number of ambiguous columns.
    pub fn ambiguity_count(&self) -> u32 {
        self.ambiguity_count
    }

    /// `|`-joined SNP tokens, e.g. `G3T|A4T`.
    pub fn snps_field(&self) -> String {
        join(&self.snps, "|")
    }

    /// `|`-joined tract tokens, e.g. `6|9-12`.
    pub fn ambiguities_field(&self) -> String {
        join(&self.ambiguities, "|")
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
