use std::sync::Arc;

use crate::genomics::SequenceProfile;

/// Sort key of a catchment member: distance, then ambiguity, then input order.
pub type RankKey = (u32, u32, usize);

/// One neighbour admitted to a catchment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Target identifier.
    pub name: Arc<str>,
    /// Distance to the query.
    pub distance: u32,
    /// Ambiguous columns in the target.
    pub ambiguities: u32,
    /// Target ordinal in its input stream.
    pub index: usize,
}

impl ResultEntry {
    /// Entry for `target` at `distance` from the query.
    pub fn from_profile(target: &SequenceProfile, distance: u32) -> Self {
        Self {
            name: target.shared_id(),
            distance,
            ambiguities: target.ambiguity_count(),
            index: target.index(),
        }
    }

    /// Ranking key; lower is better.
    pub fn rank_key(&self) -> RankKey {
        (self.distance, self.ambiguities, self.index)
    }
}

/// Outcome of offering a candidate to a bin.
#[derive(Debug, PartialEq, Eq)]
pub enum Admission {
    /// The candidate is now a member.
    Admitted,
    /// The bin is full of better candidates.
    Rejected,
    /// The candidate exceeds the bin's distance cutoff; handed back unchanged.
    BeyondCutoff(ResultEntry),
}

/// Size-capped, best-first list of neighbours for one direction.
#[derive(Debug, Clone)]
pub struct CatchmentBin {
    capacity: usize,
    max_distance: Option<u32>,
    entries: Vec<ResultEntry>,
    bound: Option<RankKey>,
}

impl CatchmentBin {
    /// Empty bin keeping at most `capacity` members within `max_distance`.
    pub fn new(capacity: usize, max_distance: Option<u32>) -> Self {
        Self {
            capacity,
            max_distance,
            entries: Vec::with_capacity(capacity.min(1024)),
            bound: None,
        }
    }

    /// Offer a candidate.
    ///
    /// Entries accumulate unsorted until the bin first fills; from then on
    /// the list stays sorted and `bound` holds the worst member's key.
    pub fn offer(&mut self, entry: ResultEntry) -> Admission {
        if self.max_distance.is_some_and(|max| entry.distance > max) {
            return Admission::BeyondCutoff(entry);
        }
        if self.capacity == 0 {
            return Admission::Rejected;
        }
        match self.bound {
            None => {
                self.entries.push(entry);
                if self.entries.len() == self.capacity {
                    self.entries.sort_by_key(ResultEntry::rank_key);
                    self.bound = self.entries.last().map(ResultEntry::rank_key);
                }
                Admission::Admitted
            }
            Some(bound) if entry.rank_key() < bound => {
                let key = entry.rank_key();
                let at = self.entries.partition_point(|e| e.rank_key() < key);
                self.entries.insert(at, entry);
                self.entries.truncate(self.capacity);
                self.bound = self.entries.last().map(ResultEntry::rank_key);
                Admission::Admitted
            }
            Some(_) => Admission::Rejected,
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been admitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Worst admitted key, once the bin has filled.
    pub fn bound(&self) -> Option<RankKey> {
        self.bound
    }

    /// Members sorted best-first.
    pub fn finalize(mut self) -> Vec<ResultEntry> {
        if self.bound.is_none() {
            self.entries.sort_by_key(ResultEntry::rank_key);
        }
        self.entries
    }
}
