//! # Sort Runtime
//!
//! Wires a process group, spawns one worker task per rank, supervises them
//! to completion, and assembles the run outcome.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (positional element count + environment overrides)
//! 2. Validate it (worker count, shard coverage, value range)
//! 3. Wire the fabric and spawn workers in rank order
//! 4. Join workers; the first failure aborts the whole run
//! 5. Report the coordinator's collected sequence

pub mod config;
pub mod wiring;

pub use config::RuntimeConfig;
pub use wiring::{run_cluster, ClusterOutcome};
