use thiserror::Error;

use crate::genomics::Direction;

/// Default fraction of a pair's SNP tally that may be masked by ambiguity.
pub const DEFAULT_PAIR_THRESHOLD: f32 = 0.1;

/// Errors raised while validating ranking parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Parameters that cannot produce a meaningful ranking.
    #[error("invalid ranking configuration: {0}")]
    InvalidConfiguration(String),
}

/// Requested number of neighbours per direction bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinSizes {
    /// One total, split evenly with the remainder going to the `same` bin.
    Total(usize),
    /// Explicit sizes in `same, up, down, side` order.
    PerBin([usize; 4]),
}

impl BinSizes {
    /// Per-bin targets in [`Direction::ALL`] order.
    pub fn targets(&self) -> [usize; 4] {
        match *self {
            BinSizes::Total(total) => {
                let share = total / 4;
                [share + total % 4, share, share, share]
            }
            BinSizes::PerBin(sizes) => sizes,
        }
    }

    /// Sum of all targets.
    pub fn total(&self) -> usize {
        self.targets().iter().sum()
    }
}

/// Parameters governing classification and per-query catchments.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchmentConfig {
    /// Requested neighbours per bin.
    pub sizes: BinSizes,
    /// Cutoff applied to every bin without its own.
    pub distance_all: Option<u32>,
    /// Per-bin cutoffs in [`Direction::ALL`] order; these win over `distance_all`.
    pub max_distances: [Option<u32>; 4],
    /// Largest tolerated masked fraction of a pair's SNP tally.
    pub pair_threshold: f32,
    /// Redistribute unfilled capacity to bins with spare candidates.
    pub fill: bool,
    /// Number of distinct fallback distances kept per bin (0 disables).
    pub push_distance: usize,
}

impl CatchmentConfig {
    /// Configuration with one total size split across the four bins.
    pub fn with_total_size(total: usize) -> Self {
        Self::with_sizes(BinSizes::Total(total))
    }

    /// Configuration with explicit `same, up, down, side` sizes.
    pub fn with_bin_sizes(sizes: [usize; 4]) -> Self {
        Self::with_sizes(BinSizes::PerBin(sizes))
    }

    fn with_sizes(sizes: BinSizes) -> Self {
        Self {
            sizes,
            distance_all: None,
            max_distances: [None; 4],
            pair_threshold: DEFAULT_PAIR_THRESHOLD,
            fill: true,
            push_distance: 0,
        }
    }

    /// Apply one distance cutoff to every bin without a cutoff of its own.
    pub fn with_distance_all(mut self, distance: u32) -> Self {
        self.distance_all = Some(distance);
        self
    }

    /// Set the cutoff for a single bin, overriding any distance-all value.
    pub fn with_max_distance(mut self, direction: Direction, distance: u32) -> Self {
        self.max_distances[direction.index()] = Some(distance);
        self
    }

    /// Set the pairwise ambiguity threshold.
    pub fn with_pair_threshold(mut self, threshold: f32) -> Self {
        self.pair_threshold = threshold;
        self
    }

    /// Enable or disable cross-bin filling.
    pub fn with_fill(mut self, enabled: bool) -> Self {
        self.fill = enabled;
        self
    }

    /// Set the number of fallback distances kept per bin.
    pub fn with_push_distance(mut self, depth: usize) -> Self {
        self.push_distance = depth;
        self
    }

    /// Check the parameters before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.total() == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "at least one bin must request a neighbour".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.pair_threshold) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "pair threshold {} is outside [0, 1]",
                self.pair_threshold
            )));
        }
        Ok(())
    }

    /// Per-bin targets in [`Direction::ALL`] order.
    pub fn targets(&self) -> [usize; 4] {
        self.sizes.targets()
    }

    /// Number of candidates each bin retains while streaming.
    ///
    /// With filling enabled a bin may end up holding the whole total, so
    /// every bin keeps that many.
    pub fn capacities(&self) -> [usize; 4] {
        if self.fill {
            [self.sizes.total(); 4]
        } else {
            self.targets()
        }
    }

    /// Effective cutoff for `direction`.
    pub fn max_distance(&self, direction: Direction) -> Option<u32> {
        self.max_distances[direction.index()].or(self.distance_all)
    }

    /// Whether the fallback structure is active for `direction`.
    pub fn pushes(&self, direction: Direction) -> bool {
        direction != Direction::Same
            && self.push_distance > 0
            && self.max_distance(direction).is_some()
    }
}
