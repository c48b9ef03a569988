use clap::Parser;
use leadstats::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancellation token coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
            cancellation_token.cancel();
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(leadstats::Error::processing_interrupted(
                    "Interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Leadstats - Business Lead Statistics Service");
    println!("============================================");
    println!();
    println!("Serve aggregate statistics and paginated records from directories of");
    println!("per-category business-lead CSV files, backed by a three-tier cache.");
    println!();
    println!("USAGE:");
    println!("    leadstats <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    countries            List the countries that have merged data on disk");
    println!("    categories           Query category statistics, optionally by location");
    println!("    data                 Fetch full records from one category file");
    println!("    stats                Show a cross-country statistics roll-up");
    println!("    precompute           Build per-state cache blobs from a merged directory");
    println!("    precompute-unmerged  Build per-state and per-city blobs from a source tree");
    println!("    help                 Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # List category statistics for Texas:");
    println!("    leadstats categories US --state Texas");
    println!();
    println!("    # Fetch the second page of restaurant records in Austin:");
    println!("    leadstats data US restaurants --state Texas --city Austin --page 2");
    println!();
    println!("    # Precompute the per-state cache for the US merged directory:");
    println!("    leadstats precompute US --data-root /srv/scraped_data");
    println!();
    println!("For detailed help on any command, use:");
    println!("    leadstats <COMMAND> --help");
}
