//! Crawler module for channel discovery and listing pagination
//!
//! This module contains the core crawling logic, including:
//! - The task model and the request shapes of each endpoint
//! - Channel discovery and per-channel pagination stages
//! - Record extraction from listing entries
//! - The controller dispatching responses to stages
//! - The HTTP fetcher and the concurrent task engine

mod controller;
mod discovery;
mod endpoints;
mod engine;
mod extractor;
mod fetcher;
pub mod log;
mod pagination;
pub mod payload;
mod task;

pub use controller::Controller;
pub use discovery::{Discovered, DiscoveryOutcome, DiscoveryStage};
pub use endpoints::Endpoints;
pub use engine::Engine;
pub use extractor::{extract_record, extract_records, strip_commas, Record};
pub use fetcher::{build_http_client, fetch_task};
pub use log::{EventLog, LogEntry, MemoryLog, TracingLog};
pub use pagination::{PageOutcome, PaginationStage};
pub use task::{Channel, QueryParams, Stage, Task};

use crate::config::Config;
use crate::output::{CrawlStatistics, FileSink};
use crate::CrawlError;
use std::path::Path;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the dated result file
/// 2. Build the controller and the task engine
/// 3. Fetch the channel list and every channel's listing pages
/// 4. Return the run statistics once no task is left
///
/// # Example
///
/// ```no_run
/// use yylive_crawler::config::Config;
/// use yylive_crawler::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = crawl(Config::default()).await?;
/// println!("{} records", stats.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<CrawlStatistics, CrawlError> {
    let run_date = chrono::Local::now().date_naive();
    let sink = Arc::new(FileSink::create(
        Path::new(&config.output.directory),
        &config.output.file_prefix,
        run_date,
        config.output.deduplicate,
    )?);
    tracing::info!("Writing results to {}", sink.path().display());

    let controller = Arc::new(Controller::new(&config, sink, Arc::new(TracingLog))?);
    let engine = Engine::new(&config.crawler, controller)?;

    Ok(engine.run().await)
}
