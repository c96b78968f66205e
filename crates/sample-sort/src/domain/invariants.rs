//! # Domain Invariants
//!
//! Rules that must always hold for the distributed sort. The service checks
//! them defensively at phase boundaries; tests exercise them directly.

use shared_types::Element;

use super::errors::SortError;
use super::value_objects::{BucketSet, PivotSet};

/// Index of the first position where `values` decreases, if any.
#[must_use]
pub fn first_descent(values: &[Element]) -> Option<usize> {
    values
        .windows(2)
        .position(|pair| pair[1] < pair[0])
        .map(|index| index + 1)
}

/// Invariant: bucketing neither creates, loses, nor duplicates elements.
///
/// The multiset union of the buckets must equal the input shard exactly.
pub fn invariant_bucket_partition(shard: &[Element], buckets: &BucketSet) -> Result<(), SortError> {
    if buckets.total_elements() != shard.len() {
        return Err(SortError::InvariantViolation(format!(
            "buckets hold {} elements, shard holds {}",
            buckets.total_elements(),
            shard.len()
        )));
    }

    let mut from_shard = shard.to_vec();
    let mut from_buckets: Vec<Element> = buckets.iter().flatten().copied().collect();
    from_shard.sort_unstable();
    from_buckets.sort_unstable();

    if from_shard != from_buckets {
        return Err(SortError::InvariantViolation(
            "bucket multiset differs from shard multiset".to_string(),
        ));
    }

    Ok(())
}

/// Invariant: every element sits inside its bucket's interval.
///
/// For bucket `k`: `boundary[k-1] <= e < boundary[k]`, with the open ends
/// at the first and last bucket.
pub fn invariant_bucket_bounds(buckets: &BucketSet, pivots: &PivotSet) -> Result<(), SortError> {
    let boundaries = pivots.as_slice();

    for (index, bucket) in buckets.iter().enumerate() {
        let lower = index.checked_sub(1).and_then(|i| boundaries.get(i));
        let upper = boundaries.get(index);

        for &element in bucket {
            if lower.is_some_and(|&bound| element < bound)
                || upper.is_some_and(|&bound| element >= bound)
            {
                return Err(SortError::InvariantViolation(format!(
                    "element {element} outside interval {index}"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_descent_none_when_sorted() {
        assert_eq!(first_descent(&[1, 2, 2, 9]), None);
        assert_eq!(first_descent(&[]), None);
        assert_eq!(first_descent(&[7]), None);
    }

    #[test]
    fn test_first_descent_index() {
        assert_eq!(first_descent(&[1, 5, 3, 9]), Some(2));
        assert_eq!(first_descent(&[2, 1]), Some(1));
    }

    #[test]
    fn test_bucket_partition_holds() {
        let shard = vec![5, 1, 8, 3];
        let buckets = BucketSet::from_buckets(vec![vec![1, 3], vec![5, 8], vec![]]);
        assert!(invariant_bucket_partition(&shard, &buckets).is_ok());
    }

    #[test]
    fn test_bucket_partition_detects_loss() {
        let shard = vec![5, 1, 8, 3];
        let buckets = BucketSet::from_buckets(vec![vec![1, 3], vec![5], vec![]]);
        assert!(invariant_bucket_partition(&shard, &buckets).is_err());
    }

    #[test]
    fn test_bucket_partition_detects_substitution() {
        let shard = vec![5, 1];
        let buckets = BucketSet::from_buckets(vec![vec![1, 6], vec![]]);
        assert!(invariant_bucket_partition(&shard, &buckets).is_err());
    }

    #[test]
    fn test_bucket_bounds_hold() {
        let pivots = PivotSet::from_candidates(vec![5, 9]);
        let buckets = BucketSet::from_buckets(vec![vec![1, 3], vec![5, 8], vec![9, 12]]);
        assert!(invariant_bucket_bounds(&buckets, &pivots).is_ok());
    }

    #[test]
    fn test_bucket_bounds_detect_high_element() {
        let pivots = PivotSet::from_candidates(vec![5, 9]);
        // 7 belongs to interval 1, not interval 0.
        let buckets = BucketSet::from_buckets(vec![vec![1, 7], vec![], vec![]]);
        assert!(invariant_bucket_bounds(&buckets, &pivots).is_err());
    }

    #[test]
    fn test_bucket_bounds_detect_low_element() {
        let pivots = PivotSet::from_candidates(vec![5, 9]);
        // 4 is below interval 1's lower boundary.
        let buckets = BucketSet::from_buckets(vec![vec![], vec![4], vec![]]);
        assert!(invariant_bucket_bounds(&buckets, &pivots).is_err());
    }
}
