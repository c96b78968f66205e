//! # Protocol-Level Scenarios
//!
//! The exchange and collection phases driven directly with fixed pivots, so
//! the expected redistribution is known exactly.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use sample_sort::{
        bucketize, collect_at_coordinator, exchange_buckets, route, PivotSet,
    };
    use shared_comm::ProcessGroup;
    use shared_types::Element;

    /// The reference scenario: N=8, P=2, pivots agreed as [5, 9].
    ///
    /// Intervals: e < 5 to worker 0, 5 <= e < 9 to worker 1, and the
    /// overflow interval e >= 9 clamps to the last worker.
    #[tokio::test]
    async fn test_reference_scenario_two_workers() {
        let shards: [Vec<Element>; 2] = [vec![5, 1, 8, 3], vec![2, 9, 4, 6]];

        let mut handles = Vec::new();
        for endpoint in ProcessGroup::new(2).into_endpoints() {
            let shard = shards[endpoint.rank()].clone();
            handles.push(tokio::spawn(async move {
                let mut endpoint = endpoint;
                let pivots = PivotSet::new(vec![5, 9]).expect("sorted");

                let outgoing = route(bucketize(&shard, &pivots), endpoint.size());
                let mut partition = exchange_buckets(&mut endpoint, outgoing)
                    .await
                    .expect("exchange");
                partition.sort_unstable();

                let collected = collect_at_coordinator(&mut endpoint, &partition)
                    .await
                    .expect("collect");
                endpoint.finalize().expect("all operations drained");
                (partition, collected)
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(
                timeout(Duration::from_secs(2), handle)
                    .await
                    .expect("timeout")
                    .expect("join"),
            );
        }

        let (partition0, collected0) = &results[0];
        let (partition1, collected1) = &results[1];

        assert_eq!(partition0, &vec![1, 2, 3, 4]);
        assert_eq!(partition1, &vec![5, 6, 8, 9]);
        assert_eq!(collected0.as_deref(), Some(&[1, 2, 3, 4, 5, 6, 8, 9][..]));
        assert!(collected1.is_none());
    }

    /// Empty buckets travel as a bare header; no payload frame follows.
    #[tokio::test]
    async fn test_exchange_with_empty_buckets() {
        // Worker 0 keeps everything below the pivot; worker 1 owns nothing.
        let shards: [Vec<Element>; 2] = [vec![1, 2], vec![0, 3]];

        let mut handles = Vec::new();
        for endpoint in ProcessGroup::new(2).into_endpoints() {
            let shard = shards[endpoint.rank()].clone();
            handles.push(tokio::spawn(async move {
                let mut endpoint = endpoint;
                let pivots = PivotSet::new(vec![100, 100]).expect("sorted");

                let outgoing = route(bucketize(&shard, &pivots), endpoint.size());
                let mut received = exchange_buckets(&mut endpoint, outgoing)
                    .await
                    .expect("exchange");
                received.sort_unstable();
                endpoint.finalize().expect("all operations drained");
                received
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(
                timeout(Duration::from_secs(2), handle)
                    .await
                    .expect("timeout")
                    .expect("join"),
            );
        }

        assert_eq!(results[0], vec![0, 1, 2, 3]);
        assert!(results[1].is_empty());
    }

    /// An empty partition is delivered as a bare header and contributes
    /// nothing to the collected sequence.
    #[tokio::test]
    async fn test_collection_with_empty_partition() {
        let partitions: [Vec<Element>; 3] = [vec![1, 2], vec![], vec![7]];

        let mut handles = Vec::new();
        for endpoint in ProcessGroup::new(3).into_endpoints() {
            let partition = partitions[endpoint.rank()].clone();
            handles.push(tokio::spawn(async move {
                let mut endpoint = endpoint;
                let collected = collect_at_coordinator(&mut endpoint, &partition)
                    .await
                    .expect("collect");
                endpoint.finalize().expect("all operations drained");
                collected
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(
                timeout(Duration::from_secs(2), handle)
                    .await
                    .expect("timeout")
                    .expect("join"),
            );
        }

        assert_eq!(results[0].as_deref(), Some(&[1, 2, 7][..]));
        assert!(results[1].is_none());
        assert!(results[2].is_none());
    }
}
