//! Pinned record entity and its persisted shape

use crate::error::Result;
use launchpin_core::LaunchResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

/// Mapping from raw query text to the record pinned under it
pub type RecordMap = HashMap<String, Record>;

/// A pinned result
///
/// Immutable once built; a re-pin replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    title: String,
    subtitle: String,
    plugin_id: String,
}

impl Record {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, plugin_id: impl Into<String>) -> Self {
        Self { title: title.into(), subtitle: subtitle.into(), plugin_id: plugin_id.into() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }
}

impl From<&LaunchResult> for Record {
    fn from(result: &LaunchResult) -> Self {
        Self::new(result.title.clone(), result.subtitle.clone(), result.plugin_id.clone())
    }
}

/// Persisted form of the pin store, as read and written by the storage layer
///
/// ```json
/// { "records": { "build": { "title": "Build #12", "subtitle": "main", "pluginId": "ci" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopMostData {
    #[serde(default)]
    pub records: RecordMap,
}

impl TopMostData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write pretty JSON to `writer` and flush it
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl From<RecordMap> for TopMostData {
    fn from(records: RecordMap) -> Self {
        Self { records }
    }
}
