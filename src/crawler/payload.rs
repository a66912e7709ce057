//! Upstream JSON payload schemas
//!
//! Only the fields the crawler consumes are modelled; anything else in the
//! response is ignored.

use crate::PayloadResult;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Every upstream response wraps its content in `{"data": ...}`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Decodes a raw response body and unwraps the envelope
pub fn decode<T: DeserializeOwned>(content: &str) -> PayloadResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(content)?;
    Ok(envelope.data)
}

/// One channel-list entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEntry {
    pub tab_name: String,

    #[serde(default, deserialize_with = "optional_code")]
    pub data_code: String,

    #[serde(default, deserialize_with = "optional_code")]
    pub sub_data_code: String,
}

/// Aggregator response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatorPage {
    pub module_list: Vec<Module>,
}

/// A named group of entries on an aggregator page
///
/// Entries stay undecoded until the module is known to contribute records,
/// since skipped modules may carry arbitrary content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub module_name: String,

    #[serde(default)]
    pub data_list: Vec<Value>,
}

/// Flat listing response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPage {
    pub live_list: Vec<LiveEntry>,
}

/// One live-show listing entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEntry {
    #[serde(deserialize_with = "scalar")]
    pub live_id: String,

    #[serde(deserialize_with = "scalar")]
    pub sid: String,

    pub live_name: String,

    pub live_desc: String,

    pub users: i64,
}

/// Accepts a string or a number and keeps its textual form
fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Like [`scalar`], but null reads as an empty code
fn optional_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string, number or null, got {}",
            other
        ))),
    }
}
