//! Data command implementation

use super::shared::{build_config, pagination_footer, print_json, setup_logging};
use crate::cli::args::{DataArgs, OutputFormat};
use crate::service::{QueryService, RecordsQuery};
use crate::Result;
use colored::Colorize;
use tracing::info;

/// Fetch one page of full records from a category file
pub async fn run_data(args: DataArgs) -> Result<()> {
    setup_logging(&args.common)?;

    let config = build_config(&args.common)?;
    let service = QueryService::new(config);

    let query = RecordsQuery {
        country: args.country.clone(),
        category: args.category.clone(),
        state: args.state.clone(),
        city: args.city.clone(),
        search: args.search.clone(),
        page: args.page,
        limit: args.limit,
    };

    let response = service.get_data(&query).await?;
    info!(
        "Fetched {} of {} records from {}/{}",
        response.data.len(),
        response.pagination.total,
        response.country,
        response.category
    );

    match args.common.format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Human => {
            println!(
                "{} from {} / {} ({} matching)",
                "Records".bold(),
                response.country.green(),
                response.category,
                response.pagination.total
            );
            let offset = (response.pagination.page - 1) * response.pagination.limit;
            for (i, record) in response.data.iter().enumerate() {
                println!("{}", format!("Record {}:", offset + i + 1).bold());
                for (field, value) in record {
                    if !value.is_empty() {
                        println!("  {:<20} {}", field, value);
                    }
                }
            }
            println!("{}", pagination_footer(&response.pagination).dimmed());
        }
    }

    Ok(())
}
