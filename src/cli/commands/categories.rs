//! Categories command implementation

use super::shared::{build_config, flags_summary, pagination_footer, print_json, setup_logging};
use crate::cli::args::{CategoriesArgs, OutputFormat};
use crate::service::{CategoriesQuery, QueryService};
use crate::Result;
use colored::Colorize;
use tracing::info;

/// Query category statistics for a country, optionally scoped to a
/// state/city and filtered by category name
pub async fn run_categories(args: CategoriesArgs) -> Result<()> {
    setup_logging(&args.common)?;

    let config = build_config(&args.common)?;
    let service = QueryService::new(config);

    let query = CategoriesQuery {
        country: args.country.clone(),
        state: args.state.clone(),
        city: args.city.clone(),
        category: args.category.clone(),
        page: args.page,
        limit: args.limit,
    };

    let response = service.list_categories(&query).await?;
    info!(
        "Resolved {} categories for {}",
        response.total_categories, response.country
    );

    match args.common.format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Human => {
            let mut scope = response.country.clone();
            if !response.state.is_empty() {
                scope.push_str(&format!(", {}", response.state));
            }
            if !response.city.is_empty() {
                scope.push_str(&format!(", {}", response.city));
            }
            println!(
                "{} for {} ({} total)",
                "Categories".bold(),
                scope.green(),
                response.total_categories
            );
            for category in &response.categories {
                println!(
                    "  {:<32} {:>10} records  [{}]",
                    category.display_name,
                    category.records,
                    flags_summary(&category.flags)
                );
            }
            println!("{}", pagination_footer(&response.pagination).dimmed());
        }
    }

    Ok(())
}
