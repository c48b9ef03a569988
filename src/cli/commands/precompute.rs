//! Precompute command implementations
//!
//! Both precomputation modes run as standalone batch jobs and can take
//! minutes over large directories, so they race against the cancellation
//! token instead of relying solely on the outer signal handler.

use super::shared::{build_config, setup_logging};
use crate::cli::args::{PrecomputeArgs, PrecomputeUnmergedArgs};
use crate::precompute::PrecomputeStats;
use crate::service::QueryService;
use crate::{Error, Result};
use colored::Colorize;
use indicatif::HumanDuration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Build per-state cache blobs from a country's merged directory
pub async fn run_precompute(
    args: PrecomputeArgs,
    cancellation_token: CancellationToken,
) -> Result<()> {
    setup_logging(&args.common)?;

    let config = build_config(&args.common)?;
    let service = QueryService::new(config);

    let states = args.states.as_ref().map(|list| {
        list.states
            .iter()
            .map(String::as_str)
            .collect::<Vec<&str>>()
    });
    info!(
        "Starting merged precompute for {} ({})",
        args.country,
        states
            .as_ref()
            .map(|s| format!("{} custom states", s.len()))
            .unwrap_or_else(|| "built-in state list".to_string())
    );

    let stats = tokio::select! {
        result = service.build_merged_cache(
            &args.country,
            states.as_deref(),
            args.common.show_progress(),
        ) => result?,
        _ = cancellation_token.cancelled() => {
            return Err(Error::processing_interrupted(
                "Precompute interrupted before completion",
            ));
        }
    };

    report(&args.country, &stats);
    Ok(())
}

/// Build per-state and per-city blobs from a country's unmerged source tree
pub async fn run_precompute_unmerged(
    args: PrecomputeUnmergedArgs,
    cancellation_token: CancellationToken,
) -> Result<()> {
    setup_logging(&args.common)?;

    let config = build_config(&args.common)?;
    let service = QueryService::new(config);

    info!("Starting unmerged precompute for {}", args.country);

    let stats = tokio::select! {
        result = service.build_unmerged_cache(&args.country) => result?,
        _ = cancellation_token.cancelled() => {
            return Err(Error::processing_interrupted(
                "Precompute interrupted before completion",
            ));
        }
    };

    report(&args.country, &stats);
    Ok(())
}

/// Print the run summary
fn report(country: &str, stats: &PrecomputeStats) {
    println!(
        "{} for {} in {}",
        "Precompute complete".green().bold(),
        country,
        HumanDuration(stats.elapsed)
    );
    println!(
        "  {} files scanned, {} failed, {} cache blobs written",
        stats.files_scanned, stats.files_failed, stats.blobs_written
    );
}
