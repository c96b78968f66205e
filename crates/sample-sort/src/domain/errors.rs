//! # Domain Errors
//!
//! Error types for the distributed sort. Every variant is fatal to the whole
//! run: the sort's correctness depends on every worker completing its
//! portion, so there is no "continue with fewer workers" mode.

use shared_comm::CommError;
use shared_types::{Rank, Tag};
use thiserror::Error;

/// Protocol phase, named in transfer diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Pivot gather, sort, and broadcast.
    PivotAgreement,
    /// Diagnostic pivot-rank reduction.
    RankEstimate,
    /// All-to-all bucket exchange.
    Shuffle,
    /// Result collection at the coordinator.
    Collect,
    /// Endpoint finalization.
    Shutdown,
}

impl Stage {
    /// Human-readable phase name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PivotAgreement => "pivot agreement",
            Self::RankEstimate => "rank estimate",
            Self::Shuffle => "shuffle",
            Self::Collect => "collect",
            Self::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Distributed sort error types.
#[derive(Debug, Error)]
pub enum SortError {
    /// Invalid run configuration, surfaced before any worker spawns.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A worker holds no elements to sample a pivot from.
    #[error("worker {rank} holds an empty shard; no pivot can be sampled")]
    EmptyShard {
        /// The shard-less worker
        rank: Rank,
    },

    /// The agreed pivot set does not have one boundary per worker.
    #[error("agreed pivot set has {got} boundaries, expected {expected}")]
    PivotCardinality {
        /// Boundaries required (the group size)
        expected: usize,
        /// Boundaries received
        got: usize,
    },

    /// Pivot boundaries are not in ascending order.
    #[error("pivot boundaries decrease at index {index}")]
    UnsortedPivots {
        /// First offending index
        index: usize,
    },

    /// A fabric operation failed. Fatal: a partial shuffle cannot be
    /// repaired without re-running the whole pivot and bucket phase.
    #[error("{stage} transfer failed: {source}")]
    Transfer {
        /// Phase in which the transfer failed
        stage: Stage,
        /// Underlying fabric failure
        #[source]
        source: CommError,
    },

    /// A payload's length disagrees with its announced count.
    #[error("rank {origin} announced {announced} elements but delivered {received}")]
    PayloadMismatch {
        /// Sending rank
        origin: Rank,
        /// Count carried by the header
        announced: usize,
        /// Elements actually received
        received: usize,
    },

    /// A frame of the wrong kind arrived on a protocol tag.
    #[error("unexpected {kind} frame from rank {origin} on tag {tag}")]
    UnexpectedFrame {
        /// Sending rank
        origin: Rank,
        /// Tag the frame arrived on
        tag: Tag,
        /// Frame kind received
        kind: &'static str,
    },

    /// An internal invariant was violated; abort with diagnostics rather
    /// than silently truncate or pad data.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl SortError {
    /// Wrap a fabric failure with the phase it occurred in.
    #[must_use]
    pub fn transfer(stage: Stage, source: CommError) -> Self {
        Self::Transfer { stage, source }
    }
}
