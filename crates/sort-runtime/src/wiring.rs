//! # Cluster Wiring
//!
//! Builds the fabric, spawns one worker task per rank, and supervises the
//! run to completion. Any worker failure is fatal: the remaining tasks are
//! aborted and the first error is surfaced.

use sample_sort::{SortError, SortWorker, WorkerReport};
use shared_comm::ProcessGroup;
use shared_types::Element;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::RuntimeConfig;

/// The assembled result of one run.
#[derive(Clone, Debug)]
pub struct ClusterOutcome {
    /// Per-worker reports, in rank order.
    pub reports: Vec<WorkerReport>,
    /// The full sorted sequence, when collection ran.
    pub collected: Option<Vec<Element>>,
    /// Summed per-pivot ranks, when estimation ran.
    pub pivot_ranks: Option<Vec<u64>>,
}

/// Run the distributed sort with `config`.
///
/// # Errors
///
/// `Config` if validation fails; otherwise the first worker error, after
/// aborting the remaining workers.
pub async fn run_cluster(config: RuntimeConfig) -> Result<ClusterOutcome, SortError> {
    config.validate()?;
    info!(
        total = config.total_elements,
        workers = config.workers,
        "starting distributed sort"
    );

    let group = ProcessGroup::<Element>::new(config.workers);
    let mut tasks = JoinSet::new();
    for endpoint in group.into_endpoints() {
        let worker_config = config.worker_config(endpoint.rank());
        tasks.spawn(SortWorker::new(endpoint, worker_config).run());
    }

    let mut reports = Vec::with_capacity(config.workers);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(report)) => reports.push(report),
            Ok(Err(err)) => {
                // Dropping the set aborts every remaining worker.
                error!(error = %err, "worker failed; aborting run");
                return Err(err);
            }
            Err(join_err) => {
                error!(error = %join_err, "worker task died; aborting run");
                return Err(SortError::InvariantViolation(format!(
                    "worker task died: {join_err}"
                )));
            }
        }
    }

    reports.sort_by_key(|report| report.rank);
    let collected = reports
        .iter_mut()
        .find_map(|report| report.collected.take());
    let pivot_ranks = reports
        .iter_mut()
        .find_map(|report| report.pivot_ranks.take());

    info!(workers = reports.len(), "distributed sort complete");
    Ok(ClusterOutcome {
        reports,
        collected,
        pivot_ranks,
    })
}
