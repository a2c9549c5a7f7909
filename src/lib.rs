//! # Relationship inference and neighbour catchments for aligned genomes
//!
//! This library compares large collections of aligned viral genomes against a
//! shared reference and ranks, for every query, its closest relatives in a
//! single pass over an arbitrarily large target stream.
//!
//! ## Core Algorithm
//!
//! 1. **Profiles**: each sequence is reduced to its SNPs and ambiguity tracts
//!    relative to the reference, using a bit-level nucleotide code in which
//!    `a & b < 16` means "definitely different".
//! 2. **Classification**: a query/target pair is tallied into query-private,
//!    shared, target-private and ambiguity-masked SNPs, and labelled
//!    same / up / down / side from which side carries private SNPs.
//! 3. **Catchments**: every query keeps a size-capped, best-first list per
//!    direction with an O(1) admission bound, a "push" fallback for bins a
//!    distance cutoff would leave empty, and a final cross-bin balance.
//!
//! ## Usage Example
//!
//! ```ignore
//! use updown::{CatchmentConfig, RankingConfig, StreamCoordinator};
//!
//! let config = RankingConfig::new(CatchmentConfig::with_total_size(10));
//! let coordinator = StreamCoordinator::new(Some(reference), queries, config)?;
//! let outcome = coordinator.run(targets)?;
//! updown::io::write_ranking(&mut std::io::stdout(), &outcome.results)?;
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod catchment; // Per-query bounded neighbour lists
pub mod genomics; // Nucleotide codes, profiles, classification
pub mod io; // FASTA and CSV readers/writers
pub mod pipeline; // Streaming listing and ranking runs

// Re-exports for convenience
pub use catchment::{BinSizes, CatchmentConfig, ConfigError, QueryResult, ResultEntry};
pub use genomics::{Direction, EncodedSequence, SequenceProfile, SequenceRecord};
pub use io::{InputError, InputRecord};
pub use pipeline::{PipelineError, RankingConfig, RankingOutcome, StreamCoordinator};
