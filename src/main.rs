//! yylive-crawler main entry point
//!
//! This is the command-line interface for the live-show directory crawler.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yylive_crawler::config::{load_config_with_hash, validate, Config};
use yylive_crawler::crawler::{crawl, Endpoints};
use yylive_crawler::output::{print_statistics, result_file_name};

/// yylive-crawler: a live-show directory crawler
///
/// Fetches the channel list, walks every channel's listing page by page
/// until a page comes back empty, and writes one line per live show to a
/// dated, BOM-prefixed result file.
#[derive(Parser, Debug)]
#[command(name = "yylive-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A live-show directory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the result file (overrides the config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration and seed request without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if let Some(dir) = cli.output_dir {
        config.output.directory = dir.to_string_lossy().into_owned();
        validate(&config)?;
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("yylive_crawler=info,warn"),
            1 => EnvFilter::new("yylive_crawler=debug,info"),
            2 => EnvFilter::new("yylive_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== yylive-crawler Dry Run ===\n");

    println!("Engine:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Request delay: {}ms", config.crawler.request_delay);
    if let Some(agent) = &config.crawler.user_agent {
        println!("  User agent: {}", agent);
    }

    println!("\nEndpoints:");
    println!("  Channel list: {}", config.endpoints.channel_list);
    println!("  Aggregator: {}", config.endpoints.aggregator);
    println!("  Coded list: {}", config.endpoints.coded_list);

    println!("\nChannels:");
    println!("  Trending: {}", config.channels.trending);
    println!("  Skipped module: {}", config.channels.banner_module);

    let today = chrono::Local::now().date_naive();
    println!("\nOutput:");
    println!(
        "  File: {}",
        PathBuf::from(&config.output.directory)
            .join(result_file_name(&config.output.file_prefix, today))
            .display()
    );
    println!("  Deduplicate: {}", config.output.deduplicate);

    let seed = Endpoints::from_config(config)?.seed_task();
    println!("\nSeed request:");
    println!("  {}", seed.url());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting crawl (max {} concurrent requests)",
        config.crawler.max_concurrent_requests
    );

    match crawl(config).await {
        Ok(stats) => {
            tracing::info!("Crawl completed: {} records written", stats.records_written);
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
