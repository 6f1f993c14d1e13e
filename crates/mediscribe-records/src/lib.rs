//! Patient record storage.
//!
//! Records live one-per-row in a spreadsheet keyed by ABHA ID, addressed by
//! header *name* so column reordering cannot corrupt writes. Without
//! spreadsheet credentials the store degrades to the offline in-memory
//! dataset.

pub mod memory;
pub mod sheets;
pub mod types;

pub use memory::MemoryStore;
pub use sheets::SheetStore;
pub use types::{image_slot_header, PatientRecord, EXPECTED_HEADERS, KEY_HEADER, MAX_IMAGE_SLOTS};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store disabled: {0}")]
    Disabled(String),

    #[error("record store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected record store response: {0}")]
    Response(String),
}

/// Result of a batch field write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub updated_cells: usize,
    /// Header names that had no matching column and were skipped.
    pub skipped_headers: Vec<String>,
}

/// Point lookup plus batch cell writes keyed by header name.
///
/// "Record not found" is a recoverable condition, so `fetch` returns
/// `Ok(None)` rather than an error. Writes are read-then-write without
/// optimistic concurrency; two sessions updating the same row race.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch(&self, abha_id: &str) -> Result<Option<PatientRecord>, StoreError>;

    async fn write_fields(
        &self,
        abha_id: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome, StoreError>;

    /// False when running against the offline fallback dataset.
    fn is_live(&self) -> bool;
}
