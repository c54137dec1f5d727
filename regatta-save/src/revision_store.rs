//! Append-only revision history.
//!
//! Revisions are stored as one pretty-printed JSON document per revision at
//! `<data_dir>/history/revision-<seq>.json`, written with the same `.tmp` +
//! rename pattern as the config file. No update or delete is exposed.

use std::path::PathBuf;

use similar::TextDiff;

use regatta_core::types::ConfigRevision;

use crate::error::{history_io, HistoryError};

/// Append-only store for [`ConfigRevision`] records.
pub trait RevisionStore {
    fn append(&self, revision: &ConfigRevision) -> Result<(), HistoryError>;
}

/// File-backed revision history under `<data_dir>/history/`.
#[derive(Debug, Clone)]
pub struct FileRevisionStore {
    data_dir: PathBuf,
}

impl FileRevisionStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn history_dir(&self) -> PathBuf {
        self.data_dir.join("history")
    }

    fn revision_path(&self, seq: u64) -> PathBuf {
        self.history_dir().join(format!("revision-{seq:06}.json"))
    }

    /// Sequence numbers present in the history, sorted ascending.
    fn sequence_numbers(&self) -> Result<Vec<u64>, HistoryError> {
        let dir = self.history_dir();
        if !dir.exists() {
            return Ok(vec![]);
        }
        let mut seqs = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| history_io(&dir, e))? {
            let entry = entry.map_err(|e| history_io(&dir, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(seq) = name
                .strip_prefix("revision-")
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|digits| digits.parse::<u64>().ok())
            else {
                continue;
            };
            seqs.push(seq);
        }
        seqs.sort_unstable();
        Ok(seqs)
    }

    /// Number of revisions in the history.
    pub fn count(&self) -> Result<u64, HistoryError> {
        Ok(self.sequence_numbers()?.len() as u64)
    }

    /// Load the revision with sequence number `seq`.
    pub fn revision(&self, seq: u64) -> Result<ConfigRevision, HistoryError> {
        let path = self.revision_path(seq);
        if !path.exists() {
            return Err(HistoryError::NotFound { seq });
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| history_io(&path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// The most recently appended revision, if any.
    pub fn latest(&self) -> Result<Option<ConfigRevision>, HistoryError> {
        match self.sequence_numbers()?.last() {
            Some(seq) => Ok(Some(self.revision(*seq)?)),
            None => Ok(None),
        }
    }

    /// Unified diff of two revisions' content.
    pub fn diff(&self, from_seq: u64, to_seq: u64) -> Result<String, HistoryError> {
        let from = self.revision(from_seq)?;
        let to = self.revision(to_seq)?;
        let old_header = format!("a/revision-{from_seq}");
        let new_header = format!("b/revision-{to_seq}");
        Ok(TextDiff::from_lines(&from.content, &to.content)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string())
    }
}

impl RevisionStore for FileRevisionStore {
    fn append(&self, revision: &ConfigRevision) -> Result<(), HistoryError> {
        let dir = self.history_dir();
        std::fs::create_dir_all(&dir).map_err(|e| history_io(&dir, e))?;

        let seq = self.sequence_numbers()?.last().copied().unwrap_or(0) + 1;
        let path = self.revision_path(seq);
        if path.exists() {
            return Err(HistoryError::Conflict { path });
        }

        let json = serde_json::to_string_pretty(revision)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| history_io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| history_io(&path, e))?;

        tracing::info!("appended revision {seq} to {}", dir.display());
        Ok(())
    }
}
