//! Sequence-level primitives: nucleotide codes, SNP/ambiguity profiles and
//! pairwise relationship classification.
//!
//! Everything here is single-threaded and allocation-light so that the
//! pipeline can call it once per target (profiles) and once per
//! query/target pair (classification).

pub mod nucleotide;
mod profile;
mod relationship;
mod types;

pub use nucleotide::{CodecError, EncodedSequence};
pub use profile::{AmbiguityTract, ProfileError, SequenceProfile, SnpEntry};
pub use relationship::{classify, compare, Comparison, Direction, Relationship, Tally};
pub use types::SequenceRecord;
