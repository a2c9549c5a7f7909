use super::ResultEntry;

#[derive(Debug, Clone)]
struct DistanceGroup {
    distance: u32,
    members: Vec<ResultEntry>,
}

/// Fallback catchment for candidates rejected by a bin's distance cutoff.
///
/// Keeps the `depth` smallest distinct distances seen, each with every
/// candidate tied at that distance. Groups are held in a sorted array, so
/// memory is bounded by `depth` groups.
#[derive(Debug, Clone)]
pub struct PushCatchment {
    depth: usize,
    groups: Vec<DistanceGroup>,
}

impl PushCatchment {
    /// Empty fallback keeping `depth` distinct distances.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            groups: Vec::with_capacity(depth + 1),
        }
    }

    /// Record a candidate that missed the cutoff.
    pub fn offer(&mut self, entry: ResultEntry) {
        match self
            .groups
            .binary_search_by_key(&entry.distance, |group| group.distance)
        {
            Ok(at) => self.groups[at].members.push(entry),
            Err(at) if at < self.depth => {
                self.groups.insert(
                    at,
                    DistanceGroup {
                        distance: entry.distance,
                        members: vec![entry],
                    },
                );
                self.groups.truncate(self.depth);
            }
            Err(_) => {}
        }
    }

    /// Returns `true` when no candidate has been recorded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Distinct distances currently held, ascending.
    pub fn distances(&self) -> Vec<u32> {
        self.groups.iter().map(|group| group.distance).collect()
    }

    /// All held candidates, best-first.
    pub fn into_entries(self) -> Vec<ResultEntry> {
        self.groups
            .into_iter()
            .flat_map(|mut group| {
                group.members.sort_by_key(ResultEntry::rank_key);
                group.members
            })
            .collect()
    }
}
