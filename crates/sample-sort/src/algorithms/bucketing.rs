//! # Bucketing
//!
//! Partitions a worker's shard into interval-aligned buckets and routes
//! them to destination ranks.

use shared_types::Element;

use crate::domain::{BucketSet, PivotSet};

/// Split `shard` into P+1 buckets along the agreed boundaries.
///
/// Each element goes to the bucket of its interval; buckets are not sorted
/// internally. Any bucket may come out empty, and duplicate boundaries
/// produce empty intervals.
#[must_use]
pub fn bucketize(shard: &[Element], pivots: &PivotSet) -> BucketSet {
    let mut buckets = vec![Vec::new(); pivots.len() + 1];
    for &element in shard {
        buckets[pivots.interval_of(element)].push(element);
    }
    BucketSet::from_buckets(buckets)
}

/// Map buckets onto destination ranks.
///
/// Bucket `i` is destined for worker `i`; any bucket index at or beyond the
/// group size is merged into the last worker's bucket: the last worker
/// absorbs the overflow interval. Exactly `group_size` outgoing bucket
/// vectors result.
#[must_use]
pub fn route(buckets: BucketSet, group_size: usize) -> Vec<Vec<Element>> {
    if group_size == 0 {
        return Vec::new();
    }

    let mut routed = buckets.into_inner();
    while routed.len() > group_size {
        if let Some(overflow) = routed.pop() {
            if let Some(last) = routed.last_mut() {
                last.extend(overflow);
            }
        }
    }
    routed.resize(group_size, Vec::new());
    routed
}
