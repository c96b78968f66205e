//! # Runtime Configuration
//!
//! Defaults, environment overrides, and validation. The worker count plays
//! the role an external process launcher would: it is supplied from outside
//! the sort itself.

use std::time::{SystemTime, UNIX_EPOCH};

use sample_sort::{SortError, WorkerConfig};
use shared_types::{Element, Rank};
use tracing::{info, warn};

/// Default worker count when `SS_WORKERS` is not set.
pub const DEFAULT_WORKERS: usize = 4;

/// Default exclusive upper bound of generated values.
pub const DEFAULT_VALUE_RANGE: Element = 1000;

/// Configuration for one distributed-sort run.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Total elements across all workers.
    pub total_elements: usize,
    /// Worker count (the process-launch parameter).
    pub workers: usize,
    /// Exclusive upper bound of generated values.
    pub value_range: Element,
    /// Base seed; worker seeds derive from it so they differ by rank.
    pub base_seed: u64,
    /// Run the diagnostic pivot-rank reduction.
    pub estimate_ranks: bool,
    /// Gather sorted slices at the coordinator.
    pub collect: bool,
}

impl RuntimeConfig {
    /// Defaults for a run of `total_elements`, seeded from the wall clock.
    #[must_use]
    pub fn new(total_elements: usize) -> Self {
        Self {
            total_elements,
            workers: DEFAULT_WORKERS,
            value_range: DEFAULT_VALUE_RANGE,
            base_seed: wall_clock_seed(),
            estimate_ranks: true,
            collect: true,
        }
    }

    /// Defaults plus environment overrides.
    ///
    /// `SS_WORKERS` sets the worker count, `SS_SEED` pins the base seed for
    /// reproducible runs, `SS_VALUE_RANGE` bounds generated values.
    #[must_use]
    pub fn from_env(total_elements: usize) -> Self {
        let mut config = Self::new(total_elements);

        if let Ok(raw) = std::env::var("SS_WORKERS") {
            match raw.parse() {
                Ok(workers) => config.workers = workers,
                Err(_) => warn!(%raw, "ignoring unparsable SS_WORKERS"),
            }
        }
        if let Ok(raw) = std::env::var("SS_SEED") {
            match raw.parse() {
                Ok(seed) => {
                    config.base_seed = seed;
                    info!(seed, "base seed pinned from environment");
                }
                Err(_) => warn!(%raw, "ignoring unparsable SS_SEED"),
            }
        }
        if let Ok(raw) = std::env::var("SS_VALUE_RANGE") {
            match raw.parse() {
                Ok(range) => config.value_range = range,
                Err(_) => warn!(%raw, "ignoring unparsable SS_VALUE_RANGE"),
            }
        }

        config
    }

    /// Validate the run before any worker spawns.
    ///
    /// # Errors
    ///
    /// `Config` on a zero worker count, a non-positive value range, or
    /// fewer elements than workers. Every worker must own at least one
    /// element so the fixed-size pivot gather is sound.
    pub fn validate(&self) -> Result<(), SortError> {
        if self.workers == 0 {
            return Err(SortError::Config("worker count must be at least 1".into()));
        }
        if self.value_range <= 0 {
            return Err(SortError::Config(format!(
                "value range must be positive, got {}",
                self.value_range
            )));
        }
        if self.total_elements < self.workers {
            return Err(SortError::Config(format!(
                "{} elements cannot cover {} workers; every worker needs at least one",
                self.total_elements, self.workers
            )));
        }
        Ok(())
    }

    /// Shard size for `rank`: N split as evenly as possible, the first
    /// N mod P workers taking one extra element.
    #[must_use]
    pub fn shard_size(&self, rank: Rank) -> usize {
        let base = self.total_elements / self.workers;
        let extra = usize::from(rank < self.total_elements % self.workers);
        base + extra
    }

    /// Seed for `rank`'s generator, distinct per worker.
    #[must_use]
    pub fn worker_seed(&self, rank: Rank) -> u64 {
        self.base_seed.wrapping_add(rank as u64)
    }

    /// The per-worker protocol configuration for `rank`.
    #[must_use]
    pub fn worker_config(&self, rank: Rank) -> WorkerConfig {
        WorkerConfig {
            shard_size: self.shard_size(rank),
            value_range: self.value_range,
            seed: self.worker_seed(rank),
            estimate_ranks: self.estimate_ranks,
            collect: self.collect,
        }
    }
}

/// Seconds since the epoch, used when no seed is pinned.
fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
