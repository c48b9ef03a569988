//! Command-line argument definitions for the lead statistics service.
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the lead statistics service
///
/// Serves aggregate statistics and paginated records from directories of
/// per-category business-lead CSV files, backed by a three-tier cache.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "leadstats",
    version,
    about = "Query aggregate statistics and records from business-lead CSV directories",
    long_about = "Serves aggregate statistics (record counts, field-availability flags) and \
                  paginated full records from large directories of per-category business-lead \
                  CSV files. Queries resolve through an in-memory TTL cache and precomputed \
                  disk blobs before falling back to parallel on-demand file scans."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List the countries that have merged data on disk
    Countries(CountriesArgs),
    /// Query category statistics, optionally filtered by location
    Categories(CategoriesArgs),
    /// Fetch full records from one category file
    Data(DataArgs),
    /// Show a cross-country statistics roll-up
    Stats(StatsArgs),
    /// Precompute per-state cache blobs from a country's merged directory
    Precompute(PrecomputeArgs),
    /// Precompute per-state and per-city blobs from an unmerged source tree
    PrecomputeUnmerged(PrecomputeUnmergedArgs),
}

/// Arguments for the countries command
#[derive(Debug, Clone, Parser)]
pub struct CountriesArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the categories command
#[derive(Debug, Clone, Parser)]
pub struct CategoriesArgs {
    /// Country code, e.g. US
    pub country: String,

    /// Filter by state name
    #[arg(long = "state", value_name = "STATE", help = "Filter rows by state name")]
    pub state: Option<String>,

    /// Filter by city name
    #[arg(long = "city", value_name = "CITY", help = "Filter rows by city name")]
    pub city: Option<String>,

    /// Filter categories by name substring
    #[arg(
        long = "category",
        value_name = "NAME",
        help = "Keep only categories whose name contains this substring"
    )]
    pub category: Option<String>,

    /// Page number (1-based)
    #[arg(short = 'p', long = "page", value_name = "N", help = "Page number, starting at 1")]
    pub page: Option<usize>,

    /// Page size
    #[arg(short = 'l', long = "limit", value_name = "N", help = "Items per page")]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the data command
#[derive(Debug, Clone, Parser)]
pub struct DataArgs {
    /// Country code, e.g. US
    pub country: String,

    /// Raw category name, matching the CSV file stem (e.g. truck_dealers)
    pub category: String,

    /// Filter rows by state name
    #[arg(long = "state", value_name = "STATE", help = "Filter rows by state name")]
    pub state: Option<String>,

    /// Filter rows by city name
    #[arg(long = "city", value_name = "CITY", help = "Filter rows by city name")]
    pub city: Option<String>,

    /// Free-text search across all fields
    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help = "Keep only rows containing this text in any field"
    )]
    pub search: Option<String>,

    /// Page number (1-based)
    #[arg(short = 'p', long = "page", value_name = "N", help = "Page number, starting at 1")]
    pub page: Option<usize>,

    /// Page size
    #[arg(short = 'l', long = "limit", value_name = "N", help = "Items per page")]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the stats command
#[derive(Debug, Clone, Parser)]
pub struct StatsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the precompute command (merged directory, static state list)
#[derive(Debug, Clone, Parser)]
pub struct PrecomputeArgs {
    /// Country code, e.g. US
    pub country: String,

    /// Target states (comma-separated list)
    ///
    /// If not specified, the built-in list of US states and territories is
    /// used. Any location name is accepted; rows are matched by substring.
    #[arg(
        long = "states",
        value_name = "LIST",
        help = "Comma-separated list of target state names"
    )]
    pub states: Option<StateList>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the precompute-unmerged command (directory-derived locations)
#[derive(Debug, Clone, Parser)]
pub struct PrecomputeUnmergedArgs {
    /// Country code, e.g. US
    pub country: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct CommonArgs {
    /// Root directory holding the per-country data directories
    ///
    /// If not specified, defaults to ~/scraped_data.
    #[arg(
        short = 'i',
        long = "data-root",
        value_name = "PATH",
        help = "Root directory holding the per-country data directories"
    )]
    pub data_root: Option<PathBuf>,

    /// Directory for disk cache blobs
    ///
    /// Defaults to `.cache` inside the data root.
    #[arg(
        long = "cache-dir",
        value_name = "PATH",
        help = "Directory for disk cache blobs"
    )]
    pub cache_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Wrapper for parsing comma-separated state lists
#[derive(Debug, Clone)]
pub struct StateList {
    pub states: Vec<String>,
}

impl FromStr for StateList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let states: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if states.is_empty() {
            return Err(Error::validation("State list cannot be empty"));
        }

        Ok(StateList { states })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl CommonArgs {
    /// Validate the shared arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(data_root) = &self.data_root {
            if !data_root.exists() {
                return Err(Error::configuration(format!(
                    "Data root does not exist: {}",
                    data_root.display()
                )));
            }
            if !data_root.is_dir() {
                return Err(Error::configuration(format!(
                    "Data root is not a directory: {}",
                    data_root.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_list_parsing() {
        let list: StateList = "Texas, California,Nevada".parse().unwrap();
        assert_eq!(list.states, vec!["Texas", "California", "Nevada"]);

        assert!(" , ".parse::<StateList>().is_err());
    }

    #[test]
    fn test_log_level_ladder() {
        let mut common = CommonArgs {
            data_root: None,
            cache_dir: None,
            verbose: 0,
            quiet: false,
            format: OutputFormat::Human,
        };
        assert_eq!(common.get_log_level(), "warn");
        common.verbose = 1;
        assert_eq!(common.get_log_level(), "info");
        common.verbose = 3;
        assert_eq!(common.get_log_level(), "trace");
        common.verbose = 0;
        common.quiet = true;
        assert_eq!(common.get_log_level(), "error");
    }

    #[test]
    fn test_categories_parse() {
        let args = Args::parse_from([
            "leadstats",
            "categories",
            "US",
            "--state",
            "Texas",
            "--page",
            "2",
            "--limit",
            "10",
        ]);
        match args.get_command() {
            Commands::Categories(c) => {
                assert_eq!(c.country, "US");
                assert_eq!(c.state.as_deref(), Some("Texas"));
                assert_eq!(c.page, Some(2));
                assert_eq!(c.limit, Some(10));
            }
            _ => panic!("expected categories command"),
        }
    }
}
