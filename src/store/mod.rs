//! Transcript persistence.

mod transcripts;

pub use transcripts::JsonlTranscriptStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::interview::TranscriptRecord;

/// Append-only store of finished interview transcripts.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Append one record.
    async fn append(&self, record: &TranscriptRecord) -> Result<(), StoreError>;

    /// All readable records, oldest first.
    async fn load_all(&self) -> Result<Vec<TranscriptRecord>, StoreError>;
}
