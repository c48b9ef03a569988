//! Command implementations for the lead statistics CLI
//!
//! Each command is implemented in its own module; this module dispatches
//! to the appropriate handler based on the parsed arguments.

pub mod categories;
pub mod countries;
pub mod data;
pub mod precompute;
pub mod shared;
pub mod stats;

use crate::cli::args::{Args, Commands};
use crate::Result;
use tokio_util::sync::CancellationToken;

/// Dispatch the parsed CLI arguments to the matching command handler.
///
/// The cancellation token is wired through to the long-running
/// precomputation commands; the query commands finish quickly enough that
/// the outer select in `main` covers them.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    match args.get_command() {
        Commands::Countries(args) => countries::run_countries(args).await,
        Commands::Categories(args) => categories::run_categories(args).await,
        Commands::Data(args) => data::run_data(args).await,
        Commands::Stats(args) => stats::run_stats(args).await,
        Commands::Precompute(args) => {
            precompute::run_precompute(args, cancellation_token).await
        }
        Commands::PrecomputeUnmerged(args) => {
            precompute::run_precompute_unmerged(args, cancellation_token).await
        }
    }
}
