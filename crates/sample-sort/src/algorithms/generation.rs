//! # Shard Generation
//!
//! Produces a worker's initial unsorted shard.

use rand::rngs::StdRng;
use rand::Rng;
use shared_types::Element;

/// Fill a shard with `len` uniform values in `[0, value_range)`.
///
/// The generator is threaded in explicitly; workers seed theirs differently
/// so shards are independent.
#[must_use]
pub fn generate_shard(rng: &mut StdRng, len: usize, value_range: Element) -> Vec<Element> {
    (0..len).map(|_| rng.gen_range(0..value_range)).collect()
}
