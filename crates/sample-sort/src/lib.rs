//! # Sample Sort
//!
//! Distributed sample sort over a message-passing fabric.
//!
//! ## Purpose
//!
//! N integers live partitioned across P workers with no shared memory. The
//! workers agree on P global pivot boundaries, redistribute their elements
//! so that worker i ends up owning the i-th value interval, sort locally,
//! and optionally deliver the concatenated result at the coordinator:
//!
//! ```text
//! generate → sample pivot → agree on pivots → (rank estimate)
//!          → bucketize → shuffle exchange → local sort → (collect)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! sample-sort/
//! ├── domain/          # PivotSet, BucketSet, shard stages, errors, invariants
//! ├── algorithms/      # Generation, sampling, ranks, bucketing
//! └── service.rs       # The worker protocol driving all phases
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod service;

// Re-exports
pub use algorithms::{bucketize, generate_shard, local_ranks, route, sample_pivot};
pub use domain::{
    first_descent, invariant_bucket_bounds, invariant_bucket_partition, BucketSet, PivotSet,
    ShardStage, SortError, Stage,
};
pub use service::{
    agree_on_pivots, collect_at_coordinator, exchange_buckets, sum_pivot_ranks, SortWorker,
    WorkerConfig, WorkerReport,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
