//! # Domain Value Objects
//!
//! Immutable value types of the distributed sort.

use serde::{Deserialize, Serialize};
use shared_types::Element;

use super::errors::SortError;
use super::invariants::first_descent;

/// The agreed global partition boundaries.
///
/// P boundary values, identical on every worker after agreement, sorted
/// ascending. They define P+1 half-open intervals
/// `(-inf, p0), [p0, p1), …, [p_{P-1}, +inf)` that exhaustively and
/// disjointly partition the value domain. Duplicate boundaries are legal
/// and simply produce an empty interval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotSet(Vec<Element>);

impl PivotSet {
    /// Wrap already-sorted boundaries.
    ///
    /// # Errors
    ///
    /// `UnsortedPivots` if the boundaries ever decrease.
    pub fn new(boundaries: Vec<Element>) -> Result<Self, SortError> {
        if let Some(index) = first_descent(&boundaries) {
            return Err(SortError::UnsortedPivots { index });
        }
        Ok(Self(boundaries))
    }

    /// Sort raw candidates into a pivot set.
    #[must_use]
    pub fn from_candidates(mut candidates: Vec<Element>) -> Self {
        candidates.sort_unstable();
        Self(candidates)
    }

    /// Number of boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The boundaries, ascending.
    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        &self.0
    }

    /// Consume into the raw boundary vector, ascending.
    #[must_use]
    pub fn into_inner(self) -> Vec<Element> {
        self.0
    }

    /// The interval a value falls in: the smallest `k` with
    /// `value < boundary[k]`, or `len()` when the value is at or above every
    /// boundary.
    ///
    /// A linear boundary scan per element; the boundary count is the process
    /// count, which is small relative to shard sizes.
    #[must_use]
    pub fn interval_of(&self, value: Element) -> usize {
        let mut interval = 0;
        while interval < self.0.len() && value >= self.0[interval] {
            interval += 1;
        }
        interval
    }
}

/// A worker's shard split into interval-aligned buckets.
///
/// P+1 buckets for P boundaries; bucket `k` holds exactly the elements of
/// interval `k`, any bucket may be empty. The multiset union of the buckets
/// equals the raw shard exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSet {
    buckets: Vec<Vec<Element>>,
}

impl BucketSet {
    /// Wrap interval-aligned buckets.
    #[must_use]
    pub fn from_buckets(buckets: Vec<Vec<Element>>) -> Self {
        Self { buckets }
    }

    /// Number of buckets (boundary count + 1).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Elements across all buckets.
    #[must_use]
    pub fn total_elements(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// The bucket at `index`, empty if out of range.
    #[must_use]
    pub fn bucket(&self, index: usize) -> &[Element] {
        self.buckets.get(index).map_or(&[], Vec::as_slice)
    }

    /// Iterate the buckets in interval order.
    pub fn iter(&self) -> impl Iterator<Item = &Vec<Element>> {
        self.buckets.iter()
    }

    /// Consume into the raw bucket vectors, in interval order.
    #[must_use]
    pub fn into_inner(self) -> Vec<Vec<Element>> {
        self.buckets
    }
}

/// Lifecycle of a worker's shard.
///
/// The shard transitions through these states as the protocol advances;
/// transitions are checked so a phase can never run against data from the
/// wrong stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShardStage {
    /// Generated, unsorted, still interval-agnostic.
    #[default]
    Raw,
    /// Split into interval-aligned buckets after pivot agreement.
    Bucketed,
    /// Union of inbound transfers after the shuffle.
    Received,
    /// Locally ordered.
    Sorted,
    /// Handed to the collector, or retained as the final partition.
    Delivered,
}

impl ShardStage {
    /// Check if transition to next state is valid.
    #[must_use]
    pub fn can_transition_to(&self, next: ShardStage) -> bool {
        matches!(
            (self, next),
            (Self::Raw, Self::Bucketed)
                | (Self::Bucketed, Self::Received)
                | (Self::Received, Self::Sorted)
                | (Self::Sorted, Self::Delivered)
        )
    }

    /// Check if this is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}
