//! Stats command implementation

use super::shared::{build_config, print_json, setup_logging};
use crate::cli::args::{OutputFormat, StatsArgs};
use crate::service::QueryService;
use crate::Result;
use colored::Colorize;
use tracing::info;

/// Show a statistics roll-up across every country on disk
pub async fn run_stats(args: StatsArgs) -> Result<()> {
    setup_logging(&args.common)?;

    let config = build_config(&args.common)?;
    let service = QueryService::new(config);

    let stats = service.stats().await?;
    info!(
        "Roll-up covers {} countries, {} categories",
        stats.total_countries, stats.total_categories
    );

    match args.common.format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Human => {
            println!("{}", "Lead data summary".bold());
            println!(
                "  {} countries, {} categories, {} records",
                stats.total_countries, stats.total_categories, stats.total_records
            );
            for country in &stats.countries {
                println!();
                println!(
                    "{} ({}): {} records in {} categories, {}",
                    country.code.green().bold(),
                    country.name,
                    country.total_records,
                    country.total_categories,
                    country.total_size
                );
                for category in &country.top_categories {
                    println!(
                        "  {:<32} {:>10} records",
                        category.display_name, category.records
                    );
                }
            }
        }
    }

    Ok(())
}
