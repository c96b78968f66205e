//! # Fabric Errors
//!
//! Transport-level failures. The protocol layer treats every one of these as
//! fatal for the whole distributed run, since a partial exchange cannot be
//! repaired locally.

use shared_types::{Rank, Tag};
use thiserror::Error;

/// Errors from fabric operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommError {
    /// A rank outside the group was addressed.
    #[error("rank {rank} outside group of size {size}")]
    UnknownRank {
        /// The offending rank
        rank: Rank,
        /// Size of the process group
        size: usize,
    },

    /// The channel toward a peer closed before delivery.
    #[error("channel to rank {0} closed")]
    ChannelClosed(Rank),

    /// The whole group disconnected while a receive was outstanding.
    #[error("group disconnected while awaiting tag {tag}")]
    Disconnected {
        /// Tag the receive was matching on
        tag: Tag,
    },

    /// A frame of the wrong kind arrived on a collective tag.
    #[error("unexpected {got} frame on tag {tag}, expected {expected}")]
    UnexpectedFrame {
        /// Tag the frame arrived on
        tag: Tag,
        /// Frame kind the operation required
        expected: &'static str,
        /// Frame kind actually received
        got: &'static str,
    },

    /// A reduction contribution had the wrong length.
    #[error("reduction contribution from rank {origin} has {got} entries, expected {expected}")]
    ReduceShape {
        /// Contributing rank
        origin: Rank,
        /// Entries expected by the root
        expected: usize,
        /// Entries received
        got: usize,
    },

    /// The broadcast root supplied no buffer to replicate.
    #[error("broadcast root {0} supplied no buffer")]
    MissingRootBuffer(Rank),

    /// Operations were issued but never confirmed complete.
    #[error("{outstanding} pending operations never completed")]
    PendingOperations {
        /// Handles issued and not yet waited on
        outstanding: usize,
    },
}
