//! # Algorithms
//!
//! The pure, worker-local computations of the sort. Everything here is free
//! of fabric traffic; the service sequences these between its wait points.

pub mod bucketing;
pub mod generation;
pub mod ranks;
pub mod sampling;

pub use bucketing::{bucketize, route};
pub use generation::generate_shard;
pub use ranks::local_ranks;
pub use sampling::sample_pivot;
