//! # Sort Runtime Entry Point
//!
//! Thin CLI over [`sort_runtime::run_cluster`]: one positional argument, the
//! total element count. The worker count comes from the environment
//! (`SS_WORKERS`), standing in for an external process launcher.

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sort_runtime::{run_cluster, RuntimeConfig};

/// Parse the positional element count, or exit with usage.
fn parse_total_elements() -> usize {
    let mut args = std::env::args().skip(1);
    let usage = "Usage: sort-runtime <total-elements>";

    let Some(raw) = args.next() else {
        eprintln!("{usage}");
        std::process::exit(1);
    };
    match raw.parse() {
        Ok(total) => total,
        Err(_) => {
            eprintln!("invalid element count: {raw}");
            eprintln!("{usage}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let total_elements = parse_total_elements();
    let config = RuntimeConfig::from_env(total_elements);

    let outcome = run_cluster(config)
        .await
        .context("distributed sort failed")?;

    if let Some(ranks) = &outcome.pivot_ranks {
        info!(ranks = ?ranks, "summed pivot ranks");
    }

    match outcome.collected {
        Some(sequence) => {
            let rendered: Vec<String> = sequence.iter().map(ToString::to_string).collect();
            println!("{}", rendered.join(" "));
        }
        None => {
            for report in &outcome.reports {
                info!(
                    rank = report.rank,
                    elements = report.partition.len(),
                    "final partition retained at worker"
                );
            }
        }
    }

    Ok(())
}
