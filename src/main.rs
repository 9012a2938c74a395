//! Gleaner main entry point
//!
//! Command-line interface for the Gleaner review harvester.

use clap::Parser;
use gleaner::config::{default_config, load_config, Config};
use gleaner::crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gleaner: a resumable Steam review harvester
///
/// Gleaner pulls paginated user reviews through the public storefront
/// API, deduplicates them, and checkpoints progress to a CSV file so an
/// interrupted harvest can resume where the last checkpoint left off.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A resumable Steam review harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore any existing checkpoint and start from scratch
    #[arg(long)]
    fresh: bool,

    /// Show the effective configuration without harvesting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => {
            tracing::info!("No config file given, using built-in defaults");
            default_config()?
        }
    };

    if cli.dry_run {
        print_effective_config(&config);
        return Ok(());
    }

    if cli.fresh {
        tracing::info!("Starting fresh harvest (ignoring previous checkpoint)");
    } else {
        tracing::info!("Starting harvest (will resume from checkpoint if present)");
    }

    run_crawl(config, cli.fresh).await?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints the effective configuration for --dry-run
fn print_effective_config(config: &Config) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Endpoint:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  App id: {}", config.api.app_id);
    println!("  Page size: {}", config.api.page_size);

    println!("\nCrawl:");
    println!("  Day ranges: {:?}", config.crawl.day_ranges);
    println!("  Filters: {:?}", config.crawl.filters);
    println!("  Max reviews: {}", config.crawl.max_reviews);
    println!("  Checkpoint interval: {}", config.crawl.checkpoint_interval);
    println!("  Stall limit: {}", config.crawl.stall_limit);
    println!("  Cursor repeat limit: {}", config.crawl.cursor_repeat_limit);
    println!("  Max retries: {}", config.crawl.max_retries);
    println!("  Request timeout: {}s", config.crawl.request_timeout);
    println!("  Round delay: {}s", config.crawl.round_delay);

    println!("\nOutput:");
    println!("  Checkpoint: {}", config.output.checkpoint_path);
    println!("  Final output: {}", config.output.output_path);

    let combos = config.combinations();
    println!("\n✓ Configuration is valid");
    println!("✓ Would harvest {} parameter combinations", combos.len());
}
