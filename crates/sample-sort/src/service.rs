//! # Sample Sort Worker Service
//!
//! Drives one worker through the full protocol over its fabric endpoint:
//!
//! 1. Generate the local shard and sample a pivot candidate.
//! 2. Agree on global pivots (gather at the coordinator, sort, broadcast).
//! 3. Optionally reduce per-pivot ranks at the coordinator (diagnostic).
//! 4. Bucketize along the agreed boundaries.
//! 5. Shuffle: exchange buckets all-to-all, sizes announced before payloads.
//! 6. Sort the received elements locally.
//! 7. Optionally deliver the sorted slice to the coordinator, which
//!    concatenates in rank order.
//!
//! ## Sequencing
//!
//! Outgoing transfers are issued as non-blocking sends up front; their
//! handles are held in per-phase collections and drained at each phase's
//! wait point, never reused across transfers. Inbound payloads are read
//! only after their specific receive completed. No worker buckets before
//! its own broadcast of the pivot set has completed.

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_comm::{Endpoint, Frame, SourceSel};
use shared_types::{is_coordinator, Element, Rank, Tag, COORDINATOR_RANK};
use tracing::{debug, info};

use crate::algorithms::{bucketize, generate_shard, local_ranks, route, sample_pivot};
use crate::domain::{
    first_descent, invariant_bucket_partition, PivotSet, ShardStage, SortError, Stage,
};

/// Tag carrying a bucket's size announcement.
pub const TAG_BUCKET_HEADER: Tag = 0;
/// Tag carrying a bucket's payload.
pub const TAG_BUCKET_PAYLOAD: Tag = 1;
/// Tag carrying a sorted slice's size announcement.
pub const TAG_RESULT_HEADER: Tag = 2;
/// Tag carrying a sorted slice's payload.
pub const TAG_RESULT_PAYLOAD: Tag = 3;

/// Per-worker protocol configuration.
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Elements this worker generates locally.
    pub shard_size: usize,
    /// Exclusive upper bound of generated values.
    pub value_range: Element,
    /// Seed for this worker's generator; must differ across workers.
    pub seed: u64,
    /// Run the diagnostic pivot-rank reduction.
    pub estimate_ranks: bool,
    /// Deliver sorted slices to the coordinator.
    pub collect: bool,
}

/// What a worker holds when the protocol completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    /// This worker's rank.
    pub rank: Rank,
    /// The worker's sorted partition of the global sequence.
    pub partition: Vec<Element>,
    /// The full sorted sequence; coordinator only, when collection ran.
    pub collected: Option<Vec<Element>>,
    /// Summed per-pivot ranks; coordinator only, when estimation ran.
    pub pivot_ranks: Option<Vec<u64>>,
}

/// One worker of the distributed sort.
pub struct SortWorker {
    endpoint: Endpoint<Element>,
    config: WorkerConfig,
}

impl SortWorker {
    /// Bind a worker to its fabric endpoint.
    #[must_use]
    pub fn new(endpoint: Endpoint<Element>, config: WorkerConfig) -> Self {
        Self { endpoint, config }
    }

    /// Run the full protocol to completion.
    ///
    /// # Errors
    ///
    /// Any [`SortError`]; all are fatal to the whole run.
    pub async fn run(self) -> Result<WorkerReport, SortError> {
        let Self {
            mut endpoint,
            config,
        } = self;
        let rank = endpoint.rank();
        let size = endpoint.size();
        let mut stage = ShardStage::default();

        let mut rng = StdRng::seed_from_u64(config.seed);
        let shard = generate_shard(&mut rng, config.shard_size, config.value_range);
        info!(rank, elements = shard.len(), "generated local shard");

        let candidate = sample_pivot(&mut rng, &shard, rank)?;
        info!(rank, pivot = candidate, "selected pivot candidate");

        let pivots = agree_on_pivots(&mut endpoint, candidate).await?;
        debug!(rank, pivots = ?pivots.as_slice(), "pivot set agreed");

        let pivot_ranks = if config.estimate_ranks {
            let totals = sum_pivot_ranks(&mut endpoint, local_ranks(&shard, &pivots)).await?;
            if let Some(totals) = &totals {
                info!(rank, ranks = ?totals, "global pivot ranks");
            }
            totals
        } else {
            None
        };

        let buckets = bucketize(&shard, &pivots);
        invariant_bucket_partition(&shard, &buckets)?;
        advance(&mut stage, ShardStage::Bucketed, rank)?;
        drop(shard);

        let received = exchange_buckets(&mut endpoint, route(buckets, size)).await?;
        advance(&mut stage, ShardStage::Received, rank)?;
        info!(rank, received = received.len(), "bucket exchange complete");

        let mut partition = received;
        partition.sort_unstable();
        advance(&mut stage, ShardStage::Sorted, rank)?;

        let collected = if config.collect {
            collect_at_coordinator(&mut endpoint, &partition).await?
        } else {
            None
        };
        advance(&mut stage, ShardStage::Delivered, rank)?;

        endpoint
            .finalize()
            .map_err(|e| SortError::transfer(Stage::Shutdown, e))?;
        info!(rank, partition = partition.len(), "worker complete");

        Ok(WorkerReport {
            rank,
            partition,
            collected,
            pivot_ranks,
        })
    }
}

/// Checked shard-stage transition.
fn advance(stage: &mut ShardStage, next: ShardStage, rank: Rank) -> Result<(), SortError> {
    if !stage.can_transition_to(next) {
        return Err(SortError::InvariantViolation(format!(
            "illegal shard transition {stage:?} -> {next:?}"
        )));
    }
    *stage = next;
    debug!(rank, stage = ?next, "shard stage advanced");
    Ok(())
}

/// Agree on the global pivot set.
///
/// Candidates gather at the coordinator, which sorts them ascending and
/// broadcasts the result. Returning from the broadcast is the wait point:
/// no caller sees pivots before its own broadcast completed.
///
/// # Errors
///
/// Transfer failure, a pivot set whose size disagrees with the group, or
/// unsorted boundaries from a misbehaving coordinator.
pub async fn agree_on_pivots(
    endpoint: &mut Endpoint<Element>,
    candidate: Element,
) -> Result<PivotSet, SortError> {
    let stage = Stage::PivotAgreement;

    let gathered = endpoint
        .gather(COORDINATOR_RANK, candidate)
        .await
        .map_err(|e| SortError::transfer(stage, e))?;

    // Only the coordinator holds the candidates; it sorts before replicating.
    let sorted = gathered.map(|candidates| PivotSet::from_candidates(candidates).into_inner());

    let boundaries = endpoint
        .broadcast(COORDINATOR_RANK, sorted)
        .await
        .map_err(|e| SortError::transfer(stage, e))?;

    if boundaries.len() != endpoint.size() {
        return Err(SortError::PivotCardinality {
            expected: endpoint.size(),
            got: boundaries.len(),
        });
    }
    PivotSet::new(boundaries)
}

/// Sum per-pivot ranks at the coordinator.
///
/// # Errors
///
/// Transfer failure during the reduction.
pub async fn sum_pivot_ranks(
    endpoint: &mut Endpoint<Element>,
    local: Vec<u64>,
) -> Result<Option<Vec<u64>>, SortError> {
    endpoint
        .reduce_sum(COORDINATOR_RANK, local)
        .await
        .map_err(|e| SortError::transfer(Stage::RankEstimate, e))
}

/// Exchange buckets all-to-all.
///
/// `outgoing` holds one bucket per destination rank. For every remote
/// destination the size header goes out first, then the payload (only when
/// non-empty), both as non-blocking sends whose handles are drained before
/// this returns. The bucket destined for this worker itself bypasses the
/// fabric. Inbound, one header is awaited from each peer in arrival order
/// (sends complete in no particular rank order), and each non-zero header
/// is matched to a payload receive from that specific source, checked
/// against the announced count.
///
/// # Errors
///
/// Transfer failure, a payload length disagreeing with its header, or an
/// unexpected frame kind on a bucket tag.
pub async fn exchange_buckets(
    endpoint: &mut Endpoint<Element>,
    outgoing: Vec<Vec<Element>>,
) -> Result<Vec<Element>, SortError> {
    let stage = Stage::Shuffle;
    let rank = endpoint.rank();
    let size = endpoint.size();

    let mut pending = Vec::with_capacity(2 * size);
    let mut merged = Vec::new();

    for (dest, bucket) in outgoing.into_iter().enumerate() {
        if dest == rank {
            // Self-directed transfer degenerates to a local copy.
            merged.extend(bucket);
            continue;
        }

        let count = bucket.len();
        debug!(rank, dest, count, "announcing bucket");
        pending.push(
            endpoint
                .isend(dest, TAG_BUCKET_HEADER, Frame::Count(count))
                .map_err(|e| SortError::transfer(stage, e))?,
        );
        if count > 0 {
            pending.push(
                endpoint
                    .isend(dest, TAG_BUCKET_PAYLOAD, Frame::Data(bucket))
                    .map_err(|e| SortError::transfer(stage, e))?,
            );
        }
    }

    for _ in 1..size {
        let header = endpoint
            .recv(SourceSel::Any, TAG_BUCKET_HEADER)
            .await
            .map_err(|e| SortError::transfer(stage, e))?;
        let source = header.source;
        let announced = match header.frame {
            Frame::Count(count) => count,
            other => {
                return Err(SortError::UnexpectedFrame {
                    origin: source,
                    tag: TAG_BUCKET_HEADER,
                    kind: other.kind(),
                });
            }
        };
        if announced == 0 {
            debug!(rank, source, "empty bucket announced");
            continue;
        }

        let payload = endpoint
            .recv(SourceSel::From(source), TAG_BUCKET_PAYLOAD)
            .await
            .map_err(|e| SortError::transfer(stage, e))?;
        match payload.frame {
            Frame::Data(elements) => {
                if elements.len() != announced {
                    return Err(SortError::PayloadMismatch {
                        origin: source,
                        announced,
                        received: elements.len(),
                    });
                }
                debug!(rank, source, count = announced, "bucket received");
                merged.extend(elements);
            }
            other => {
                return Err(SortError::UnexpectedFrame {
                    origin: source,
                    tag: TAG_BUCKET_PAYLOAD,
                    kind: other.kind(),
                });
            }
        }
    }

    // Every issued send must be confirmed before the phase ends.
    for operation in pending {
        operation
            .wait()
            .map_err(|e| SortError::transfer(stage, e))?;
    }

    Ok(merged)
}

/// Deliver sorted slices to the coordinator.
///
/// Same header-then-payload discipline as the shuffle, on dedicated tags.
/// The coordinator receives in ascending rank order and concatenates: the
/// pivot intervals are disjoint and rank-ordered, so the concatenation is
/// globally sorted without a merge step; this is checked before
/// returning.
///
/// # Errors
///
/// Transfer failure, a payload length disagreeing with its header, or a
/// concatenation that is not non-decreasing.
pub async fn collect_at_coordinator(
    endpoint: &mut Endpoint<Element>,
    partition: &[Element],
) -> Result<Option<Vec<Element>>, SortError> {
    let stage = Stage::Collect;

    if !is_coordinator(endpoint.rank()) {
        let mut pending = vec![endpoint
            .isend(
                COORDINATOR_RANK,
                TAG_RESULT_HEADER,
                Frame::Count(partition.len()),
            )
            .map_err(|e| SortError::transfer(stage, e))?];
        if !partition.is_empty() {
            pending.push(
                endpoint
                    .isend(
                        COORDINATOR_RANK,
                        TAG_RESULT_PAYLOAD,
                        Frame::Data(partition.to_vec()),
                    )
                    .map_err(|e| SortError::transfer(stage, e))?,
            );
        }
        for operation in pending {
            operation
                .wait()
                .map_err(|e| SortError::transfer(stage, e))?;
        }
        return Ok(None);
    }

    let mut collected = partition.to_vec();
    for source in 1..endpoint.size() {
        let header = endpoint
            .recv(SourceSel::From(source), TAG_RESULT_HEADER)
            .await
            .map_err(|e| SortError::transfer(stage, e))?;
        let announced = match header.frame {
            Frame::Count(count) => count,
            other => {
                return Err(SortError::UnexpectedFrame {
                    origin: source,
                    tag: TAG_RESULT_HEADER,
                    kind: other.kind(),
                });
            }
        };
        if announced == 0 {
            continue;
        }

        let payload = endpoint
            .recv(SourceSel::From(source), TAG_RESULT_PAYLOAD)
            .await
            .map_err(|e| SortError::transfer(stage, e))?;
        match payload.frame {
            Frame::Data(elements) => {
                if elements.len() != announced {
                    return Err(SortError::PayloadMismatch {
                        origin: source,
                        announced,
                        received: elements.len(),
                    });
                }
                collected.extend(elements);
            }
            other => {
                return Err(SortError::UnexpectedFrame {
                    origin: source,
                    tag: TAG_RESULT_PAYLOAD,
                    kind: other.kind(),
                });
            }
        }
    }

    if let Some(index) = first_descent(&collected) {
        return Err(SortError::InvariantViolation(format!(
            "collected sequence decreases at index {index}"
        )));
    }
    Ok(Some(collected))
}
