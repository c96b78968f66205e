//! # Core Entities
//!
//! The primitive vocabulary of the distributed sort.

/// Worker rank within the process group (0..group size).
pub type Rank = usize;

/// The sortable payload type. Elements carry no identity beyond their value,
/// so the sort is not required to be stable.
pub type Element = i32;

/// Small integer tag identifying a point-to-point channel. Tags at or above
/// the fabric's reserved base are claimed by collective operations.
pub type Tag = u16;

/// The rank that aggregates pivots and, optionally, the final result.
pub const COORDINATOR_RANK: Rank = 0;

/// Whether `rank` plays the coordinator role.
///
/// Coordinator-vs-worker behavior is a branch over the same process type,
/// keeping the group symmetric for collective operations.
#[must_use]
pub fn is_coordinator(rank: Rank) -> bool {
    rank == COORDINATOR_RANK
}
