//! Countries command implementation

use super::shared::{build_config, print_json, setup_logging};
use crate::cli::args::{CountriesArgs, OutputFormat};
use crate::service::QueryService;
use crate::Result;
use colored::Colorize;
use tracing::info;

/// List every country that has merged data on disk
pub async fn run_countries(args: CountriesArgs) -> Result<()> {
    setup_logging(&args.common)?;

    let config = build_config(&args.common)?;
    let service = QueryService::new(config);

    let countries = service.list_countries().await?;
    info!("Found {} countries", countries.len());

    match args.common.format {
        OutputFormat::Json => print_json(&countries)?,
        OutputFormat::Human => {
            println!("{} ({})", "Available countries".bold(), countries.len());
            for country in &countries {
                println!(
                    "  {}  {:<24} {} categories",
                    country.code.green().bold(),
                    country.name,
                    country.total_categories
                );
            }
        }
    }

    Ok(())
}
