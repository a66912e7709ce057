//! Crawl run statistics
//!
//! Counters are shared by the controller and the engine while a crawl runs,
//! then frozen into a [`CrawlStatistics`] report.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters for a crawl run
#[derive(Debug, Default)]
pub struct CrawlCounters {
    channels_discovered: AtomicU64,
    pages_fetched: AtomicU64,
    pages_with_records: AtomicU64,
    chains_exhausted: AtomicU64,
    parse_failures: AtomicU64,
    fetch_failures: AtomicU64,
    records_written: AtomicU64,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_channels(&self, count: u64) {
        self.channels_discovered.fetch_add(count, Ordering::Relaxed);
    }

    pub fn page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn page_with_records(&self, written: u64) {
        self.pages_with_records.fetch_add(1, Ordering::Relaxed);
        self.records_written.fetch_add(written, Ordering::Relaxed);
    }

    pub fn chain_exhausted(&self) {
        self.chains_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn parse_failed(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Freezes the counters into a report
    pub fn snapshot(&self, elapsed: Duration) -> CrawlStatistics {
        CrawlStatistics {
            channels_discovered: self.channels_discovered.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pages_with_records: self.pages_with_records.load(Ordering::Relaxed),
            chains_exhausted: self.chains_exhausted.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Channels found in the channel list
    pub channels_discovered: u64,

    /// Responses dispatched into a stage (seed included)
    pub pages_fetched: u64,

    /// Listing pages that yielded at least one record
    pub pages_with_records: u64,

    /// Chains that ended on an empty page
    pub chains_exhausted: u64,

    /// Payloads that failed to decode
    pub parse_failures: u64,

    /// Requests that failed before a payload was received
    pub fetch_failures: u64,

    /// Records written to the sink
    pub records_written: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Branches that ended on an error rather than an empty page
    pub fn failed_branches(&self) -> u64 {
        self.parse_failures + self.fetch_failures
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Channels discovered: {}", stats.channels_discovered);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Pages with records: {}", stats.pages_with_records);
    println!("  Records written: {}", stats.records_written);
    println!("  Duration: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Chains:");
    println!("  Exhausted (empty page): {}", stats.chains_exhausted);
    println!("  Abandoned (parse failure): {}", stats.parse_failures);
    println!("  Abandoned (fetch failure): {}", stats.fetch_failures);

    if stats.failed_branches() > 0 {
        println!();
        println!(
            "Warning: {} branch(es) ended early; the result file may be incomplete",
            stats.failed_branches()
        );
    }
}
