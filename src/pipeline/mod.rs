//! End-to-end runs: streaming profile listings and catchment ranking.

mod config;
mod coordinator;

use std::io::{self, Write};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::catchment::ConfigError;
use crate::genomics::{EncodedSequence, SequenceProfile, SequenceRecord};
use crate::io::{write_listing_header, write_listing_row, InputError, InputRecord};

pub use config::{RankingConfig, DEFAULT_BATCH_SIZE};
pub use coordinator::{RankingOutcome, RankingSummary, StreamCoordinator};

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading or parsing an input failed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The run parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),

    /// A ranking worker thread panicked.
    #[error("a ranking worker terminated unexpectedly")]
    WorkerPanicked,
}

/// Warn about reference columns that are not a plain base.
///
/// Such columns can never yield a SNP, which is allowed but rarely intended.
pub fn check_reference(reference: &SequenceRecord) {
    let ambiguous = reference.sequence.ambiguous_sites();
    if ambiguous > 0 {
        warn!(
            "reference '{}' has {} ambiguous sites; no SNPs will be called there",
            reference.id, ambiguous
        );
    }
}

/// Profile every record of a (small) input, preserving input order.
pub fn profile_all<I>(
    reference: Option<&EncodedSequence>,
    records: I,
) -> Result<Vec<SequenceProfile>, PipelineError>
where
    I: IntoIterator<Item = Result<InputRecord, InputError>>,
{
    let records = records.into_iter().collect::<Result<Vec<_>, _>>()?;
    let profiles = records
        .into_par_iter()
        .map(|record| record.into_profile(reference))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(profiles)
}

/// Stream `records` through profile extraction and write a profile listing.
///
/// Records are profiled in parallel batches of `batch_size`; rows are written
/// in input order. Returns the number of rows written.
pub fn list_profiles<I, W>(
    reference: &EncodedSequence,
    records: I,
    writer: &mut W,
    batch_size: usize,
) -> Result<usize, PipelineError>
where
    I: IntoIterator<Item = Result<SequenceRecord, InputError>>,
    W: Write,
{
    if batch_size == 0 {
        return Err(ConfigError::InvalidConfiguration("batch size must be > 0".to_string()).into());
    }

    write_listing_header(writer).map_err(PipelineError::Output)?;

    let mut records = records.into_iter();
    let mut written = 0;
    loop {
        let batch = records
            .by_ref()
            .take(batch_size)
            .collect::<Result<Vec<_>, _>>()?;
        let profiles = batch
            .par_iter()
            .map(|record| SequenceProfile::extract(reference, record))
            .collect::<Result<Vec<_>, _>>()
            .map_err(InputError::from)?;

        for profile in &profiles {
            write_listing_row(writer, profile).map_err(PipelineError::Output)?;
        }
        written += profiles.len();

        if batch.len() < batch_size {
            break;
        }
    }

    writer.flush().map_err(PipelineError::Output)?;
    info!("listed {} sequences", written);
    Ok(written)
}
