//! # Pivot Sampling
//!
//! Selects one candidate pivot per worker from its local shard.

use rand::rngs::StdRng;
use rand::Rng;
use shared_types::{Element, Rank};

use crate::domain::SortError;

/// Uniformly select one element of `shard` as this worker's pivot candidate.
///
/// Deterministic given a fixed generator state; the caller seeds generators
/// differently across workers so candidates rarely collide.
///
/// # Errors
///
/// `EmptyShard` if the shard holds no elements. The aggregator's gather is
/// fixed-size, so an empty shard cannot simply be skipped here. Run
/// configuration rejects element counts below the worker count before any
/// worker starts.
pub fn sample_pivot(rng: &mut StdRng, shard: &[Element], rank: Rank) -> Result<Element, SortError> {
    if shard.is_empty() {
        return Err(SortError::EmptyShard { rank });
    }
    Ok(shard[rng.gen_range(0..shard.len())])
}
