//! # Pivot Rank Estimation
//!
//! Diagnostic-only: how many local elements fall strictly below each pivot.
//! The counts are summed across workers at the coordinator to flag
//! catastrophic load imbalance; they never affect the sorted result.

use shared_types::Element;

use crate::domain::PivotSet;

/// Count, per pivot, the local elements strictly below it.
#[must_use]
pub fn local_ranks(shard: &[Element], pivots: &PivotSet) -> Vec<u64> {
    pivots
        .as_slice()
        .iter()
        .map(|&pivot| shard.iter().filter(|&&element| element < pivot).count() as u64)
        .collect()
}
