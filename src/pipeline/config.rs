use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::thread;

use crate::catchment::{CatchmentConfig, ConfigError};

/// Targets profiled per parallel batch.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Parameters for a full ranking run.
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Classification and per-query catchment parameters.
    pub catchment: CatchmentConfig,
    /// Targets with more ambiguous columns than this are skipped.
    pub max_target_ambiguities: Option<u32>,
    /// Target names skipped before classification.
    pub ignore: HashSet<String>,
    /// Targets profiled per parallel batch.
    pub batch_size: usize,
    /// Ranking worker threads; 0 picks the available parallelism.
    pub workers: usize,
}

impl RankingConfig {
    /// Run configuration around `catchment` with default stream settings.
    pub fn new(catchment: CatchmentConfig) -> Self {
        Self {
            catchment,
            max_target_ambiguities: None,
            ignore: HashSet::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            workers: 0,
        }
    }

    /// Skip targets with more than `limit` ambiguous columns.
    pub fn with_max_target_ambiguities(mut self, limit: u32) -> Self {
        self.max_target_ambiguities = Some(limit);
        self
    }

    /// Skip the named targets.
    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the number of targets profiled per batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the number of ranking worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check the parameters before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "batch size must be > 0".to_string(),
            ));
        }
        self.catchment.validate()
    }

    /// Whether a target with `ambiguities` ambiguous columns is ranked at all.
    pub fn admits_target(&self, ambiguities: u32) -> bool {
        self.max_target_ambiguities
            .map_or(true, |limit| ambiguities <= limit)
    }

    /// Ranking threads for `queries` queries: never more than one per query.
    pub fn worker_count(&self, queries: usize) -> usize {
        let requested = match self.workers {
            0 => thread::available_parallelism().map_or(1, NonZeroUsize::get),
            n => n,
        };
        requested.min(queries).max(1)
    }
}
