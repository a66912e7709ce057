use serde::Deserialize;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub endpoints: EndpointsConfig,
    pub device: DeviceConfig,
    pub channels: ChannelsConfig,
    pub output: OutputConfig,
}

/// Worker engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of requests in flight at once
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Delay before each request (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// User-Agent header; reqwest's default when unset
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 4,
            request_timeout: 30,
            request_delay: 0,
            user_agent: None,
        }
    }
}

/// Upstream endpoint locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Channel list (the crawl seed)
    #[serde(rename = "channel-list")]
    pub channel_list: String,

    /// Module-grouped listing used by channels without a data code
    pub aggregator: String,

    /// Flat listing keyed by data code / sub data code
    #[serde(rename = "coded-list")]
    pub coded_list: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            channel_list: "http://data.3g.yy.com/nav/v3/infoList".to_string(),
            aggregator: "http://d.3g.yy.com/index/v4/infoList".to_string(),
            coded_list: "http://data.3g.yy.com/data/liveList".to_string(),
        }
    }
}

/// Device identification sent as query parameters on every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    #[serde(rename = "os-version")]
    pub os_version: String,
    pub imei: String,
    pub uid: String,
    pub os: String,
    #[serde(rename = "yy-version")]
    pub yy_version: String,
    pub model: String,
    #[serde(rename = "isp-type")]
    pub isp_type: String,
    pub channel: String,
    #[serde(rename = "net-type")]
    pub net_type: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            os_version: "4.4.4".to_string(),
            imei: "622266312844051".to_string(),
            uid: "0".to_string(),
            os: "android".to_string(),
            yy_version: "4.5.1".to_string(),
            model: "TiantianVM".to_string(),
            isp_type: "1".to_string(),
            channel: "official".to_string(),
            net_type: "2".to_string(),
        }
    }
}

/// Distinguished channel and module identifiers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Channel whose listing pages use the aggregator (module list) shape
    pub trending: String,

    /// Aggregator module that never contributes records
    #[serde(rename = "banner-module")]
    pub banner_module: String,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            trending: "热门".to_string(),
            banner_module: "banner".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the per-run result file
    pub directory: String,

    /// Result file name prefix (`<prefix>.<date>.csv`)
    #[serde(rename = "file-prefix")]
    pub file_prefix: String,

    /// Drop records already written during this run
    pub deduplicate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./result".to_string(),
            file_prefix: "yylive".to_string(),
            deduplicate: false,
        }
    }
}
