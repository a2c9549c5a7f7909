use std::sync::Arc;

use tracing::warn;

use super::{balance, Admission, CatchmentBin, CatchmentConfig, PushCatchment, ResultEntry};
use crate::genomics::{classify, Direction, Relationship, SequenceProfile};

/// Finalized neighbours for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Query identifier.
    pub query: Arc<str>,
    /// Query ordinal in its input stream.
    pub index: usize,
    /// Best-first neighbours in [`Direction::ALL`] order.
    pub bins: [Vec<ResultEntry>; 4],
    /// Bins whose content came from the push fallback.
    pub fallbacks: Vec<Direction>,
}

impl QueryResult {
    /// Neighbours for `direction`, best first.
    pub fn bin(&self, direction: Direction) -> &[ResultEntry] {
        &self.bins[direction.index()]
    }

    /// Target names for `direction`, best first.
    pub fn names(&self, direction: Direction) -> Vec<&str> {
        self.bin(direction)
            .iter()
            .map(|entry| entry.name.as_ref())
            .collect()
    }
}

/// The four catchment bins (and their fallbacks) owned by one query.
///
/// A set is mutated by exactly one ranking task, so it carries no locks.
#[derive(Debug)]
pub struct QueryCatchmentSet {
    query: Arc<SequenceProfile>,
    bins: [CatchmentBin; 4],
    push: [Option<PushCatchment>; 4],
    pair_threshold: f32,
}

impl QueryCatchmentSet {
    /// Empty catchments for `query`.
    pub fn new(query: Arc<SequenceProfile>, config: &CatchmentConfig) -> Self {
        let capacities = config.capacities();
        let bins = Direction::ALL
            .map(|d| CatchmentBin::new(capacities[d.index()], config.max_distance(d)));
        let push = Direction::ALL.map(|d| {
            config
                .pushes(d)
                .then(|| PushCatchment::new(config.push_distance))
        });
        Self {
            query,
            bins,
            push,
            pair_threshold: config.pair_threshold,
        }
    }

    /// Classify `target` against the query and offer it to the matching bin.
    ///
    /// Returns the relationship, or `None` when the pair fails the ambiguity
    /// gate.
    pub fn absorb(&mut self, target: &SequenceProfile) -> Option<Relationship> {
        let relationship = classify(&self.query, target, self.pair_threshold)?;
        let slot = relationship.direction.index();
        let entry = ResultEntry::from_profile(target, relationship.distance);
        if let Admission::BeyondCutoff(entry) = self.bins[slot].offer(entry) {
            if let Some(push) = self.push[slot].as_mut() {
                push.offer(entry);
            }
        }
        Some(relationship)
    }

    /// Substitute fallbacks into empty bins, balance sizes and sort.
    ///
    /// A bin that outputs nothing regardless (target 0, no filling) never
    /// takes its fallback. Substitutions are reported only when some of the
    /// fallback survives balancing.
    pub fn finalize(self, config: &CatchmentConfig) -> QueryResult {
        let Self {
            query, bins, push, ..
        } = self;
        let targets = config.targets();

        let mut finalized: [Vec<ResultEntry>; 4] = Default::default();
        let mut substituted: [Option<Vec<u32>>; 4] = Default::default();
        for ((direction, bin), push) in Direction::ALL.into_iter().zip(bins).zip(push) {
            let slot = direction.index();
            let mut entries = bin.finalize();
            let can_output = config.fill || targets[slot] > 0;
            if entries.is_empty() && can_output {
                if let Some(push) = push.filter(|push| !push.is_empty()) {
                    substituted[slot] = Some(push.distances());
                    entries = push.into_entries();
                }
            }
            finalized[slot] = entries;
        }

        let observed = finalized.each_ref().map(Vec::len);
        let sizes = balance(targets, observed, config.fill);
        for (entries, size) in finalized.iter_mut().zip(sizes) {
            entries.truncate(size);
        }

        let mut fallbacks = Vec::new();
        for direction in Direction::ALL {
            let slot = direction.index();
            let Some(distances) = substituted[slot].take() else {
                continue;
            };
            if finalized[slot].is_empty() {
                continue;
            }
            warn!(
                "query {}: no {} neighbours within distance {}, using fallback at distances {:?}",
                query.id(),
                direction,
                config.max_distance(direction).unwrap_or_default(),
                distances
            );
            fallbacks.push(direction);
        }

        QueryResult {
            query: query.shared_id(),
            index: query.index(),
            bins: finalized,
            fallbacks,
        }
    }
}
