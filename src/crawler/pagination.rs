//! Pagination stage
//!
//! Extracts the records on one listing page, flushes them to the sink and
//! decides whether the channel's chain continues. There is no upstream
//! "has more" flag: a page without records ends the chain.

use crate::config::ChannelsConfig;
use crate::crawler::extractor::{extract_records, Record};
use crate::crawler::log::EventLog;
use crate::crawler::payload::{decode, AggregatorPage, FlatPage, LiveEntry};
use crate::crawler::task::{Channel, Task};
use crate::output::RecordSink;
use crate::PayloadResult;
use std::sync::Arc;

/// Result of processing one listing page
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// The page had records; the chain continues with `next`
    Continue {
        records: usize,
        written: usize,
        next: Task,
    },
    /// The page had no records; the chain ends
    Exhausted,
    /// The payload could not be decoded; the chain ends
    Abandoned,
}

impl PageOutcome {
    /// Follow-up task for the engine, if any
    pub fn into_task(self) -> Option<Task> {
        match self {
            Self::Continue { next, .. } => Some(next),
            Self::Exhausted | Self::Abandoned => None,
        }
    }
}

pub struct PaginationStage {
    trending: String,
    banner_module: String,
    sink: Arc<dyn RecordSink>,
    log: Arc<dyn EventLog>,
}

impl PaginationStage {
    pub fn new(channels: &ChannelsConfig, sink: Arc<dyn RecordSink>, log: Arc<dyn EventLog>) -> Self {
        Self {
            trending: channels.trending.clone(),
            banner_module: channels.banner_module.clone(),
            sink,
            log,
        }
    }

    /// Extracts every record on a page
    ///
    /// The payload shape is chosen by channel name: the trending channel's
    /// pages are grouped into modules (the banner module is skipped), every
    /// other channel's page is a flat list.
    pub fn extract_page(&self, channel: &Channel, content: &str) -> PayloadResult<Vec<Record>> {
        if channel.name == self.trending {
            let page: AggregatorPage = decode(content)?;
            let mut records = Vec::new();
            for module in page
                .module_list
                .into_iter()
                .filter(|module| module.module_name != self.banner_module)
            {
                let entries = module
                    .data_list
                    .into_iter()
                    .map(serde_json::from_value::<LiveEntry>)
                    .collect::<Result<Vec<_>, _>>()?;
                records.extend(extract_records(&entries, channel));
            }
            Ok(records)
        } else {
            let page: FlatPage = decode(content)?;
            Ok(extract_records(&page.live_list, channel))
        }
    }

    /// Processes one fetched page of `channel`'s listing
    pub fn run(&self, task: &Task, channel: &Channel, page: u32, content: &str) -> PageOutcome {
        let records = match self.extract_page(channel, content) {
            Ok(records) => records,
            Err(e) => {
                self.log.error(
                    &format!(
                        "[Channel {}, page {}] get list json parse failed: {}",
                        channel.name, page, e
                    ),
                    &page_context(channel, page),
                );
                return PageOutcome::Abandoned;
            }
        };

        self.log.info(
            &format!(
                "[Channel {}, page {}] got {} live shows",
                channel.name,
                page,
                records.len()
            ),
            &page_context(channel, page),
        );

        if records.is_empty() {
            return PageOutcome::Exhausted;
        }

        let written = match self.sink.append_batch(&records) {
            Ok(written) => written,
            Err(e) => {
                self.log.error(
                    &format!(
                        "[Channel {}, page {}] failed to write records: {}",
                        channel.name, page, e
                    ),
                    &page_context(channel, page),
                );
                0
            }
        };

        match task.next_page() {
            Some(next) => PageOutcome::Continue {
                records: records.len(),
                written,
                next,
            },
            None => PageOutcome::Exhausted,
        }
    }
}

fn page_context(channel: &Channel, page: u32) -> [(&'static str, String); 2] {
    [("channel", channel.name.clone()), ("page", page.to_string())]
}
