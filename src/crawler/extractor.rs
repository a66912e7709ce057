//! Record extraction
//!
//! Turns raw listing entries into normalized [`Record`]s. Pure functions, no
//! shared state.

use crate::crawler::payload::LiveEntry;
use crate::crawler::task::Channel;
use std::fmt;

/// One normalized live-show row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub channel: String,
    pub live_id: String,
    pub sid: String,
    pub live_name: String,
    pub live_desc: String,
    pub watching: i64,
}

impl Record {
    /// Output line: the six fields joined by commas, no quoting or escaping
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.channel, self.live_id, self.sid, self.live_name, self.live_desc, self.watching
        )
    }
}

/// Removes every comma from a free-text field
pub fn strip_commas(text: &str) -> String {
    text.replace(',', "")
}

/// Builds the record for one entry of `channel`'s listing
pub fn extract_record(entry: &LiveEntry, channel: &Channel) -> Record {
    Record {
        channel: channel.name.clone(),
        live_id: entry.live_id.clone(),
        sid: entry.sid.clone(),
        live_name: strip_commas(&entry.live_name),
        live_desc: strip_commas(&entry.live_desc),
        watching: entry.users,
    }
}

/// Extracts every entry in order
pub fn extract_records<'a, I>(entries: I, channel: &Channel) -> Vec<Record>
where
    I: IntoIterator<Item = &'a LiveEntry>,
{
    entries
        .into_iter()
        .map(|entry| extract_record(entry, channel))
        .collect()
}
