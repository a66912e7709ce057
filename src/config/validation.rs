use crate::config::types::{
    ChannelsConfig, Config, CrawlerConfig, DeviceConfig, EndpointsConfig, OutputConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_endpoints(&config.endpoints)?;
    validate_device(&config.device)?;
    validate_channels(&config.channels)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates worker engine settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 64, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that every endpoint is an absolute http(s) URL
fn validate_endpoints(config: &EndpointsConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("channel-list", &config.channel_list),
        ("aggregator", &config.aggregator),
        ("coded-list", &config.coded_list),
    ] {
        validate_endpoint_url(name, value)?;
    }
    Ok(())
}

fn validate_endpoint_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} endpoint '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} endpoint '{}' must use http or https",
            name, value
        )));
    }

    if url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} endpoint '{}' must not carry a query string",
            name, value
        )));
    }

    Ok(())
}

/// Validates device query values
fn validate_device(config: &DeviceConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("os-version", &config.os_version),
        ("imei", &config.imei),
        ("uid", &config.uid),
        ("os", &config.os),
        ("yy-version", &config.yy_version),
        ("model", &config.model),
        ("isp-type", &config.isp_type),
        ("channel", &config.channel),
        ("net-type", &config.net_type),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!(
                "device {} cannot be empty",
                name
            )));
        }
    }
    Ok(())
}

fn validate_channels(config: &ChannelsConfig) -> Result<(), ConfigError> {
    if config.trending.is_empty() {
        return Err(ConfigError::Validation(
            "trending channel name cannot be empty".to_string(),
        ));
    }

    if config.banner_module.is_empty() {
        return Err(ConfigError::Validation(
            "banner module name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "file_prefix cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "file_prefix must be a bare file name, got '{}'",
            config.file_prefix
        )));
    }

    Ok(())
}
