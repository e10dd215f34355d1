/// JSON layout for exchanging history with external callers.
///
/// The file is an ordered array of `{ "content": ..., "start"?: n, "end"?: n }`
/// records, oldest first.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// One persisted snapshot. Missing offsets are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl From<&Snapshot> for SnapshotRecord {
    fn from(s: &Snapshot) -> Self {
        Self {
            content: s.content.clone(),
            start: s.start,
            end: s.end,
        }
    }
}

impl From<SnapshotRecord> for Snapshot {
    fn from(r: SnapshotRecord) -> Self {
        Snapshot {
            content: r.content,
            start: r.start,
            end: r.end,
        }
    }
}

/// Ordered sequence of snapshot records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryFile {
    pub records: Vec<SnapshotRecord>,
}

impl HistoryFile {
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Self {
        Self {
            records: snapshots.iter().map(SnapshotRecord::from).collect(),
        }
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.records.into_iter().map(Snapshot::from).collect()
    }

    /// Reads a history file from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse history file: {}", path.display()))
    }

    /// Writes the history as pretty-printed JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize history")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history file: {}", path.display()))
    }
}
