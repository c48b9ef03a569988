//! Shared components for CLI commands
//!
//! Common setup (logging, configuration) and output helpers used across
//! the command implementations.

use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::models::{FieldFlags, Pagination};
use crate::Result;
use serde::Serialize;
use tracing::debug;

/// Set up structured logging based on the shared CLI arguments
pub fn setup_logging(common: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leadstats={}", log_level)));

    if common.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Build and validate the service configuration from the shared arguments
pub fn build_config(common: &CommonArgs) -> Result<Config> {
    common.validate()?;

    let mut config = match &common.data_root {
        Some(root) => Config::new(root),
        None => Config::default(),
    };
    if let Some(cache_dir) = &common.cache_dir {
        config = config.with_cache_dir(cache_dir);
    }
    config.validate()?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Short tag list for field-availability flags, e.g. "email, phone"
pub fn flags_summary(flags: &FieldFlags) -> String {
    let mut tags = Vec::new();
    if flags.has_email {
        tags.push("email");
    }
    if flags.has_phone {
        tags.push("phone");
    }
    if flags.has_website {
        tags.push("website");
    }
    if flags.has_facebook {
        tags.push("facebook");
    }
    if flags.has_instagram {
        tags.push("instagram");
    }
    if flags.has_linkedin {
        tags.push("linkedin");
    }
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

/// One-line pagination footer, e.g. "Page 2 of 3 (45 total)"
pub fn pagination_footer(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} total)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    )
}
