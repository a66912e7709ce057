//! Output module for crawl results
//!
//! This module handles:
//! - Writing extracted records to the dated result file
//! - Recording crawl statistics and printing the run report

mod sink;
pub mod stats;

pub use sink::{
    result_file_name, FileSink, MemorySink, OutputError, OutputResult, RecordSink, BOM,
};
pub use stats::{print_statistics, CrawlCounters, CrawlStatistics};
