//! Crawl controller
//!
//! Single dispatch point between fetched responses and the stages. The
//! controller keeps no crawl state of its own: each task says which stage
//! consumes its response, and the crawl is over once the engine has no
//! tasks left.

use crate::config::Config;
use crate::crawler::discovery::{DiscoveryOutcome, DiscoveryStage};
use crate::crawler::endpoints::Endpoints;
use crate::crawler::log::EventLog;
use crate::crawler::pagination::{PageOutcome, PaginationStage};
use crate::crawler::task::{Stage, Task};
use crate::output::{CrawlCounters, RecordSink};
use crate::ConfigError;
use std::sync::Arc;

pub struct Controller {
    endpoints: Arc<Endpoints>,
    discovery: DiscoveryStage,
    pagination: PaginationStage,
    counters: Arc<CrawlCounters>,
}

impl Controller {
    /// Wires both stages to the given sink and log
    pub fn new(
        config: &Config,
        sink: Arc<dyn RecordSink>,
        log: Arc<dyn EventLog>,
    ) -> Result<Self, ConfigError> {
        let endpoints = Arc::new(Endpoints::from_config(config)?);
        Ok(Self {
            discovery: DiscoveryStage::new(Arc::clone(&endpoints), Arc::clone(&log)),
            pagination: PaginationStage::new(&config.channels, sink, log),
            endpoints,
            counters: Arc::new(CrawlCounters::new()),
        })
    }

    /// The task that starts a crawl
    pub fn seed_task(&self) -> Task {
        self.endpoints.seed_task()
    }

    pub fn counters(&self) -> &Arc<CrawlCounters> {
        &self.counters
    }

    /// Routes a fetched response into the stage recorded on its task
    ///
    /// # Returns
    ///
    /// The follow-up tasks to enqueue; empty when the branch ends
    pub fn dispatch(&self, task: &Task, content: &str) -> Vec<Task> {
        self.counters.page_fetched();

        match &task.stage {
            Stage::Discovery => match self.discovery.run(content) {
                DiscoveryOutcome::Discovered(discovered) => {
                    self.counters.add_channels(discovered.channels.len() as u64);
                    discovered.tasks
                }
                DiscoveryOutcome::Abandoned => {
                    self.counters.parse_failed();
                    Vec::new()
                }
            },
            Stage::Pagination { channel, page } => {
                let outcome = self.pagination.run(task, channel, *page, content);
                match &outcome {
                    PageOutcome::Continue { written, .. } => {
                        self.counters.page_with_records(*written as u64)
                    }
                    PageOutcome::Exhausted => self.counters.chain_exhausted(),
                    PageOutcome::Abandoned => self.counters.parse_failed(),
                }
                outcome.into_task().into_iter().collect()
            }
        }
    }
}
