//! # End-to-End Pipeline Properties
//!
//! Full runs over the real fabric. With a pinned base seed the generated
//! shards are reproducible, so the tests can rebuild the exact input
//! multiset and assert the output is a sorted permutation of it.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::time::timeout;

    use sample_sort::generate_shard;
    use shared_types::Element;
    use sort_runtime::{run_cluster, ClusterOutcome, RuntimeConfig};

    const SEED: u64 = 0xC0FFEE;

    fn config(total: usize, workers: usize) -> RuntimeConfig {
        let mut config = RuntimeConfig::new(total);
        config.workers = workers;
        config.base_seed = SEED;
        config
    }

    async fn run(config: RuntimeConfig) -> ClusterOutcome {
        timeout(Duration::from_secs(10), run_cluster(config))
            .await
            .expect("timeout")
            .expect("run")
    }

    /// Rebuild the multiset every worker generated, sorted for comparison.
    ///
    /// Each worker draws its shard before anything else from a generator
    /// seeded exactly as the runtime seeds it, so regeneration is faithful.
    fn expected_multiset(config: &RuntimeConfig) -> Vec<Element> {
        let mut all = Vec::with_capacity(config.total_elements);
        for rank in 0..config.workers {
            let mut rng = StdRng::seed_from_u64(config.worker_seed(rank));
            all.extend(generate_shard(
                &mut rng,
                config.shard_size(rank),
                config.value_range,
            ));
        }
        all.sort_unstable();
        all
    }

    fn assert_sorted(sequence: &[Element]) {
        assert!(
            sequence.windows(2).all(|pair| pair[0] <= pair[1]),
            "sequence not non-decreasing"
        );
    }

    #[tokio::test]
    async fn test_collected_output_is_sorted_permutation() {
        let config = config(64, 4);
        let expected = expected_multiset(&config);

        let outcome = run(config).await;
        let collected = outcome.collected.expect("coordinator result");

        assert_sorted(&collected);
        let mut actual = collected;
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_uneven_split_loses_nothing() {
        // 10 elements over 3 workers: shard sizes 4, 3, 3.
        let config = config(10, 3);
        let expected = expected_multiset(&config);

        let outcome = run(config).await;
        let collected = outcome.collected.expect("coordinator result");

        assert_eq!(collected.len(), 10);
        assert_sorted(&collected);
        let mut actual = collected;
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_one_element_per_worker() {
        let config = config(8, 8);
        let outcome = run(config).await;
        let collected = outcome.collected.expect("coordinator result");
        assert_eq!(collected.len(), 8);
        assert_sorted(&collected);
    }

    #[tokio::test]
    async fn test_single_worker_degenerates_to_local_sort() {
        let config = config(40, 1);
        let expected = expected_multiset(&config);

        let outcome = run(config).await;
        let collected = outcome.collected.expect("coordinator result");

        // With one worker the shuffle is a self-copy; the result is exactly
        // the locally generated shard, sorted.
        assert_eq!(collected, expected);
    }

    #[tokio::test]
    async fn test_heavy_duplicates() {
        // A tiny value domain forces duplicate pivots and empty intervals.
        let mut config = config(48, 4);
        config.value_range = 3;
        let expected = expected_multiset(&config);

        let outcome = run(config).await;
        let collected = outcome.collected.expect("coordinator result");

        assert_sorted(&collected);
        let mut actual = collected;
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_distributed_mode_partitions_by_rank() {
        let mut config = config(60, 4);
        config.collect = false;
        let expected = expected_multiset(&config);

        let outcome = run(config).await;
        assert!(outcome.collected.is_none());

        // Each partition is sorted, and partitions are ordered across
        // ranks: concatenating in rank order is globally sorted.
        let mut concatenated = Vec::new();
        for report in &outcome.reports {
            assert_sorted(&report.partition);
            if let (Some(&last), Some(&first)) =
                (concatenated.last(), report.partition.first())
            {
                assert!(last <= first, "partitions overlap across ranks");
            }
            concatenated.extend_from_slice(&report.partition);
        }

        assert_sorted(&concatenated);
        concatenated.sort_unstable();
        assert_eq!(concatenated, expected);
    }

    #[tokio::test]
    async fn test_pivot_ranks_are_plausible() {
        let config = config(100, 4);
        let total = config.total_elements as u64;

        let outcome = run(config).await;
        let ranks = outcome.pivot_ranks.expect("diagnostic enabled");

        // One counter per pivot, each bounded by the population, and
        // non-decreasing in pivot order.
        assert_eq!(ranks.len(), 4);
        assert!(ranks.iter().all(|&count| count <= total));
        assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
