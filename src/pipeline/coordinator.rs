use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread;

use rayon::prelude::*;
use tracing::{debug, info};

use super::{PipelineError, RankingConfig};
use crate::catchment::{CatchmentConfig, QueryCatchmentSet, QueryResult};
use crate::genomics::{EncodedSequence, SequenceProfile};
use crate::io::{InputError, InputRecord};

/// Profiled target batches buffered per ranking worker.
const QUEUE_DEPTH: usize = 2;

type Batch = Arc<Vec<SequenceProfile>>;

/// Counts describing one pass over the target stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingSummary {
    /// Records read from the stream.
    pub targets_read: usize,
    /// Records dropped by name.
    pub ignored: usize,
    /// Records dropped for exceeding the ambiguity cutoff.
    pub over_ambiguity_cutoff: usize,
    /// Profiles delivered to the ranking workers.
    pub ranked: usize,
}

/// Results of a ranking run, in query input order.
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    /// One result per query.
    pub results: Vec<QueryResult>,
    /// Stream counts.
    pub summary: RankingSummary,
}

/// Streams targets once past every query.
///
/// The calling thread reads the target stream in batches, the rayon pool
/// profiles each batch, and the batch is broadcast to a fixed set of ranking
/// workers. Each worker exclusively owns the catchments of a disjoint subset
/// of queries, so catchments need no locking.
#[derive(Debug)]
pub struct StreamCoordinator {
    reference: Option<EncodedSequence>,
    queries: Vec<Arc<SequenceProfile>>,
    config: RankingConfig,
}

impl StreamCoordinator {
    /// Prepare a run of `queries` (in input order) against a target stream.
    ///
    /// `reference` is required only if targets arrive as raw sequences.
    pub fn new(
        reference: Option<EncodedSequence>,
        queries: Vec<SequenceProfile>,
        config: RankingConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            reference,
            queries: queries.into_iter().map(Arc::new).collect(),
            config,
        })
    }

    /// Number of queries being ranked.
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// Consume `targets` and return one result per query, in query order.
    ///
    /// The first read, parse or width error stops the stream and is returned;
    /// no results are returned in that case.
    pub fn run<I>(&self, targets: I) -> Result<RankingOutcome, PipelineError>
    where
        I: IntoIterator<Item = Result<InputRecord, InputError>>,
    {
        let workers = self.config.worker_count(self.queries.len());
        let catchment = &self.config.catchment;

        let mut shards: Vec<Vec<(usize, QueryCatchmentSet)>> =
            (0..workers).map(|_| Vec::new()).collect();
        for (slot, query) in self.queries.iter().enumerate() {
            let set = QueryCatchmentSet::new(Arc::clone(query), catchment);
            shards[slot % workers].push((slot, set));
        }

        info!(
            "ranking {} queries on {} workers",
            self.queries.len(),
            workers
        );

        let mut arena: Vec<Option<QueryResult>> = (0..self.queries.len()).map(|_| None).collect();
        let streamed = thread::scope(|scope| -> Result<RankingSummary, PipelineError> {
            let mut senders = Vec::with_capacity(workers);
            let mut handles = Vec::with_capacity(workers);
            for shard in shards {
                let (tx, rx) = mpsc::sync_channel::<Batch>(QUEUE_DEPTH);
                senders.push(tx);
                handles.push(scope.spawn(move || rank_shard(shard, rx, catchment)));
            }

            let streamed = self.stream_targets(targets, &senders);
            drop(senders);

            for handle in handles {
                let finished = handle.join().map_err(|_| PipelineError::WorkerPanicked)?;
                for (slot, result) in finished {
                    arena[slot] = Some(result);
                }
            }
            streamed
        });
        let summary = streamed?;

        info!(
            "read {} targets: {} ranked, {} ignored, {} over the ambiguity cutoff",
            summary.targets_read, summary.ranked, summary.ignored, summary.over_ambiguity_cutoff
        );

        let results = arena
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(PipelineError::WorkerPanicked)?;
        Ok(RankingOutcome { results, summary })
    }

    fn stream_targets<I>(
        &self,
        targets: I,
        senders: &[SyncSender<Batch>],
    ) -> Result<RankingSummary, PipelineError>
    where
        I: IntoIterator<Item = Result<InputRecord, InputError>>,
    {
        let mut summary = RankingSummary::default();
        let mut targets = targets.into_iter();
        let reference = self.reference.as_ref();

        loop {
            let mut records = Vec::with_capacity(self.config.batch_size);
            let mut read = 0;
            for record in targets.by_ref().take(self.config.batch_size) {
                let record = record?;
                read += 1;
                if self.config.ignore.contains(record.id()) {
                    summary.ignored += 1;
                    continue;
                }
                records.push(record);
            }
            summary.targets_read += read;

            let mut profiles = records
                .into_par_iter()
                .map(|record| record.into_profile(reference))
                .collect::<Result<Vec<_>, _>>()?;

            let before = profiles.len();
            profiles.retain(|profile| self.config.admits_target(profile.ambiguity_count()));
            summary.over_ambiguity_cutoff += before - profiles.len();
            summary.ranked += profiles.len();

            if !profiles.is_empty() {
                debug!("broadcasting {} target profiles", profiles.len());
                let batch: Batch = Arc::new(profiles);
                for sender in senders {
                    sender
                        .send(Arc::clone(&batch))
                        .map_err(|_| PipelineError::WorkerPanicked)?;
                }
            }

            if read < self.config.batch_size {
                return Ok(summary);
            }
        }
    }
}

fn rank_shard(
    mut shard: Vec<(usize, QueryCatchmentSet)>,
    batches: Receiver<Batch>,
    config: &CatchmentConfig,
) -> Vec<(usize, QueryResult)> {
    for batch in batches {
        for target in batch.iter() {
            for (_, set) in shard.iter_mut() {
                set.absorb(target);
            }
        }
    }
    shard
        .into_iter()
        .map(|(slot, set)| (slot, set.finalize(config)))
        .collect()
}
