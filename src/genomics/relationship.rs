use std::cmp::Ordering;
use std::fmt;

use super::{AmbiguityTract, SequenceProfile};

/// Coarse placement of a target relative to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// No private SNPs on either side (identical or polytomy).
    Same,
    /// The query carries private SNPs, the target none: target looks ancestral.
    Up,
    /// The target carries private SNPs, the query none: target looks derived.
    Down,
    /// Both carry private SNPs.
    Side,
}

impl Direction {
    /// All directions in output column order.
    pub const ALL: [Direction; 4] = [
        Direction::Same,
        Direction::Up,
        Direction::Down,
        Direction::Side,
    ];

    /// Position of the direction in [`Direction::ALL`].
    pub fn index(self) -> usize {
        match self {
            Direction::Same => 0,
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Side => 3,
        }
    }

    /// Lowercase label used in logs and headers.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Same => "same",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Side => "side",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Four-way count of SNPs for a query/target pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// SNPs only the query carries.
    pub query_private: u32,
    /// SNPs both carry with the same allele.
    pub shared: u32,
    /// SNPs only the target carries.
    pub target_private: u32,
    /// SNPs of either side that fall in the other side's ambiguity tracts.
    pub masked: u32,
}

impl Tally {
    /// Sum of all four counts.
    pub fn total(&self) -> u32 {
        self.query_private + self.shared + self.target_private + self.masked
    }

    /// Fraction of the tally hidden by missing data; zero for an empty tally.
    pub fn masked_fraction(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.masked as f32 / total as f32,
        }
    }

    /// Decision table on which side carries private SNPs.
    pub fn direction(&self) -> Direction {
        match (self.query_private > 0, self.target_private > 0) {
            (false, false) => Direction::Same,
            (true, false) => Direction::Up,
            (false, true) => Direction::Down,
            (true, true) => Direction::Side,
        }
    }
}

/// Raw outcome of comparing two profiles, before the ambiguity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    /// SNP tally.
    pub tally: Tally,
    /// Distinct positions carrying a private SNP on either side.
    pub distance: u32,
}

/// Accepted classification of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship {
    /// Placement of the target relative to the query.
    pub direction: Direction,
    /// Number of distinct differing positions.
    pub distance: u32,
}

/// Forward-only cursor answering "is this position masked" for ascending
/// positions.
struct TractCursor<'a> {
    tracts: &'a [AmbiguityTract],
    next: usize,
}

impl<'a> TractCursor<'a> {
    fn new(tracts: &'a [AmbiguityTract]) -> Self {
        Self { tracts, next: 0 }
    }

    fn covers(&mut self, position: u32) -> bool {
        while self
            .tracts
            .get(self.next)
            .is_some_and(|tract| tract.stop < position)
        {
            self.next += 1;
        }
        self.tracts
            .get(self.next)
            .is_some_and(|tract| tract.contains(position))
    }
}

/// Tally the SNPs of `query` and `target` with a single merge over both
/// position-sorted lists.
pub fn compare(query: &SequenceProfile, target: &SequenceProfile) -> Comparison {
    let (q, t) = (query.snps(), target.snps());
    let mut masks_query = TractCursor::new(target.ambiguities());
    let mut masks_target = TractCursor::new(query.ambiguities());
    let mut tally = Tally::default();
    let mut distance = 0;
    let (mut i, mut j) = (0, 0);

    loop {
        let order = match (q.get(i), t.get(j)) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => a.position.cmp(&b.position),
        };
        match order {
            Ordering::Less => {
                if masks_query.covers(q[i].position) {
                    tally.masked += 1;
                } else {
                    tally.query_private += 1;
                    distance += 1;
                }
                i += 1;
            }
            Ordering::Greater => {
                if masks_target.covers(t[j].position) {
                    tally.masked += 1;
                } else {
                    tally.target_private += 1;
                    distance += 1;
                }
                j += 1;
            }
            Ordering::Equal => {
                if q[i].alternate == t[j].alternate {
                    tally.shared += 1;
                } else {
                    // Different alleles at one column: private to both, one difference.
                    tally.query_private += 1;
                    tally.target_private += 1;
                    distance += 1;
                }
                i += 1;
                j += 1;
            }
        }
    }

    Comparison { tally, distance }
}

/// Classify `target` relative to `query`.
///
/// Returns `None` when more than `threshold` of the tally is masked by
/// ambiguity. A pair with no SNPs at all is `Same` at distance 0.
pub fn classify(
    query: &SequenceProfile,
    target: &SequenceProfile,
    threshold: f32,
) -> Option<Relationship> {
    let Comparison { tally, distance } = compare(query, target);
    if tally.masked_fraction() > threshold {
        return None;
    }
    Some(Relationship {
        direction: tally.direction(),
        distance,
    })
}
