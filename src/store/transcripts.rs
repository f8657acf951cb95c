//! Newline-delimited JSON transcript log.
//!
//! Each record is one line, appended and synced. Readers skip lines that do
//! not parse, so a torn final write loses only that record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::interview::TranscriptRecord;

use super::TranscriptStore;

/// Append-only transcript store backed by a `.jsonl` file.
pub struct JsonlTranscriptStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlTranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TranscriptStore for JsonlTranscriptStore {
    async fn append(&self, record: &TranscriptRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.sync_data().await?;

        debug!(path = %self.path.display(), "Transcript appended");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<TranscriptRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TranscriptRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping malformed transcript line"
                ),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::{CandidateField, CandidateInfo};

    fn record(name: &str, answers: &[&str]) -> TranscriptRecord {
        let mut info = CandidateInfo::default();
        info.set(CandidateField::Name, name);
        TranscriptRecord {
            candidate_info: info,
            tech_questions: "Q".to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            timestamp: "2024-01-01_00-00-00".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlTranscriptStore::new(dir.path().join("none.jsonl"));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn appends_accumulate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlTranscriptStore::new(dir.path().join("nested/logs/responses.jsonl"));

        store.append(&record("Alice", &["a"])).await.unwrap();
        store.append(&record("Bob", &[])).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, vec![record("Alice", &["a"]), record("Bob", &[])]);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[tokio::test]
    async fn torn_line_does_not_lose_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.jsonl");
        let store = JsonlTranscriptStore::new(&path);

        store.append(&record("Alice", &[])).await.unwrap();
        let mut raw = std::fs::read_to_string(&path).unwrap();
        raw.push_str("{\"candidate_info\": {\"name\": \"Tru");
        std::fs::write(&path, raw).unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].candidate_info.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn unwritable_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        let store = JsonlTranscriptStore::new(&path);

        let err = store.append(&record("Alice", &[])).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
