//! Request shapes for the three upstream endpoints
//!
//! Query parameters are emitted in the order the upstream mobile client uses.

use crate::config::{Config, DeviceConfig};
use crate::crawler::task::{Channel, QueryParams, Task};
use crate::ConfigError;
use std::sync::Arc;
use url::Url;

/// Resolved endpoint URLs plus the device identity sent with every request
#[derive(Debug, Clone)]
pub struct Endpoints {
    channel_list: Url,
    aggregator: Url,
    coded_list: Url,
    device: DeviceConfig,
}

impl Endpoints {
    /// Parses the configured endpoint URLs
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let parse = |name: &str, value: &str| {
            Url::parse(value)
                .map_err(|e| ConfigError::InvalidUrl(format!("{} endpoint '{}': {}", name, value, e)))
        };

        Ok(Self {
            channel_list: parse("channel-list", &config.endpoints.channel_list)?,
            aggregator: parse("aggregator", &config.endpoints.aggregator)?,
            coded_list: parse("coded-list", &config.endpoints.coded_list)?,
            device: config.device.clone(),
        })
    }

    pub fn aggregator_url(&self) -> &Url {
        &self.aggregator
    }

    pub fn coded_list_url(&self) -> &Url {
        &self.coded_list
    }

    /// The seed request: fetches the channel list
    pub fn seed_task(&self) -> Task {
        let d = &self.device;
        let query = QueryParams::new()
            .with("osVersion", &d.os_version)
            .with("imei", &d.imei)
            .with("uid", &d.uid)
            .with("os", &d.os)
            .with("yyVersion", &d.yy_version)
            .with("model", &d.model)
            .with("ispType", &d.isp_type)
            .with("channel", &d.channel)
            .with("netType", &d.net_type);

        Task::discovery(self.channel_list.clone(), query)
    }

    /// First listing page for a channel, endpoint chosen by its data code
    pub fn first_page_task(&self, channel: Arc<Channel>) -> Task {
        if channel.uses_aggregator() {
            self.aggregator_task(channel)
        } else {
            self.coded_list_task(channel)
        }
    }

    fn aggregator_task(&self, channel: Arc<Channel>) -> Task {
        let d = &self.device;
        let query = QueryParams::new()
            .with("totalCount", "0")
            .with("osVersion", &d.os_version)
            .with("imei", &d.imei)
            .with("uid", &d.uid)
            .with("os", &d.os)
            .with("page", "1")
            .with("yyVersion", &d.yy_version)
            .with("model", &d.model)
            .with("ispType", &d.isp_type)
            .with("channel", &d.channel)
            .with("netType", &d.net_type);

        Task::first_page(self.aggregator.clone(), query, channel)
    }

    fn coded_list_task(&self, channel: Arc<Channel>) -> Task {
        let d = &self.device;
        let query = QueryParams::new()
            .with("osVersion", &d.os_version)
            .with("imei", &d.imei)
            .with("uid", &d.uid)
            .with("os", &d.os)
            .with("subDataCode", &channel.sub_data_code)
            .with("page", "1")
            .with("yyVersion", &d.yy_version)
            .with("model", &d.model)
            .with("ispType", &d.isp_type)
            .with("dataCode", &channel.data_code)
            .with("channel", &d.channel)
            .with("netType", &d.net_type);

        Task::first_page(self.coded_list.clone(), query, channel)
    }
}
