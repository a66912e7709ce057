//! Channel discovery stage
//!
//! Reads the channel list returned by the seed request and starts one
//! pagination chain per channel.

use crate::crawler::endpoints::Endpoints;
use crate::crawler::log::EventLog;
use crate::crawler::payload::{decode, ChannelEntry};
use crate::crawler::task::{Channel, Task};
use std::sync::Arc;

/// Channels found in the channel list, with one first-page task each
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    pub channels: Vec<Arc<Channel>>,
    pub tasks: Vec<Task>,
}

/// Result of running the discovery stage
#[derive(Debug, Clone)]
pub enum DiscoveryOutcome {
    Discovered(Discovered),
    /// The channel list could not be decoded; nothing was emitted
    Abandoned,
}

impl DiscoveryOutcome {
    /// Follow-up tasks for the engine
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            Self::Discovered(discovered) => discovered.tasks,
            Self::Abandoned => Vec::new(),
        }
    }
}

pub struct DiscoveryStage {
    endpoints: Arc<Endpoints>,
    log: Arc<dyn EventLog>,
}

impl DiscoveryStage {
    pub fn new(endpoints: Arc<Endpoints>, log: Arc<dyn EventLog>) -> Self {
        Self { endpoints, log }
    }

    /// Decodes the channel list and seeds every channel's chain
    ///
    /// A malformed payload is logged and abandons discovery; the crawl then
    /// proceeds as if there were no channels.
    pub fn run(&self, content: &str) -> DiscoveryOutcome {
        let entries: Vec<ChannelEntry> = match decode(content) {
            Ok(entries) => entries,
            Err(e) => {
                self.log
                    .error("Get channel failed", &[("error", e.to_string())]);
                return DiscoveryOutcome::Abandoned;
            }
        };

        let channels: Vec<Arc<Channel>> = entries
            .into_iter()
            .map(|entry| Arc::new(Channel::new(entry.tab_name, entry.data_code, entry.sub_data_code)))
            .collect();

        let tasks = channels
            .iter()
            .map(|channel| self.endpoints.first_page_task(Arc::clone(channel)))
            .collect();

        self.log.info(
            &format!("Got {} channels", channels.len()),
            &[("channels", channels.len().to_string())],
        );

        DiscoveryOutcome::Discovered(Discovered { channels, tasks })
    }
}
