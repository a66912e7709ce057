//! Crawl task model
//!
//! A [`Task`] is an immutable description of one request: the endpoint, its
//! ordered query parameters, and the [`Stage`] that consumes the response.
//! Advancing a pagination chain builds a fresh task instead of mutating the
//! previous one.

use std::fmt;
use std::sync::Arc;
use url::Url;

/// One crawlable section of the directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    /// Display name (the upstream tab name)
    pub name: String,

    /// Listing data code; empty selects the aggregator endpoint
    pub data_code: String,

    /// Listing sub data code
    pub sub_data_code: String,
}

impl Channel {
    pub fn new(
        name: impl Into<String>,
        data_code: impl Into<String>,
        sub_data_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_code: data_code.into(),
            sub_data_code: sub_data_code.into(),
        }
    }

    /// Returns true if this channel is listed through the aggregator endpoint
    pub fn uses_aggregator(&self) -> bool {
        self.data_code.is_empty()
    }
}

/// Ordered query parameters
///
/// Order is preserved so requests go out exactly as the upstream client
/// sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter, or replaces the value in place if the key exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder-style [`QueryParams::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The stage a task's response is dispatched into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// The seed request: response is the channel list
    Discovery,

    /// One page of a channel's listing
    Pagination {
        /// The owning channel, shared by every task in the chain
        channel: Arc<Channel>,
        /// Page number, starting at 1
        page: u32,
    },
}

/// An immutable crawl request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Endpoint without query string
    pub endpoint: Url,

    /// Query parameters, in wire order
    pub query: QueryParams,

    /// Stage that consumes the response
    pub stage: Stage,
}

impl Task {
    /// Creates the discovery (seed) task
    pub fn discovery(endpoint: Url, query: QueryParams) -> Self {
        Self {
            endpoint,
            query,
            stage: Stage::Discovery,
        }
    }

    /// Creates the first pagination task of a channel's chain
    ///
    /// The `page` query parameter is set to 1.
    pub fn first_page(endpoint: Url, query: QueryParams, channel: Arc<Channel>) -> Self {
        Self {
            endpoint,
            query: query.with("page", "1"),
            stage: Stage::Pagination { channel, page: 1 },
        }
    }

    /// Builds the task for the following page
    ///
    /// Every query parameter is copied except `page`, which is incremented.
    /// The channel is shared by reference. Returns `None` for the discovery task.
    pub fn next_page(&self) -> Option<Task> {
        match &self.stage {
            Stage::Discovery => None,
            Stage::Pagination { channel, page } => {
                let next = page + 1;
                let mut query = self.query.clone();
                query.set("page", next.to_string());
                Some(Task {
                    endpoint: self.endpoint.clone(),
                    query,
                    stage: Stage::Pagination {
                        channel: Arc::clone(channel),
                        page: next,
                    },
                })
            }
        }
    }

    /// Owning channel, absent for the discovery task
    pub fn channel(&self) -> Option<&Arc<Channel>> {
        match &self.stage {
            Stage::Discovery => None,
            Stage::Pagination { channel, .. } => Some(channel),
        }
    }

    /// Page number, absent for the discovery task
    pub fn page(&self) -> Option<u32> {
        match &self.stage {
            Stage::Discovery => None,
            Stage::Pagination { page, .. } => Some(*page),
        }
    }

    /// Full request URL with the query string applied
    pub fn url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        url
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stage {
            Stage::Discovery => write!(f, "[Discovery] {}", self.endpoint),
            Stage::Pagination { channel, page } => {
                write!(f, "[Channel {}, page {}] {}", channel.name, page, self.endpoint)
            }
        }
    }
}
