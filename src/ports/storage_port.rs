//! Persistence port: named text blobs.

use crate::domain::error::JournalError;

/// Blob storage keyed by a fixed identifier. A write replaces the whole blob.
pub trait StoragePort {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn read_blob(&self, key: &str) -> Result<Option<String>, JournalError>;

    fn write_blob(&mut self, key: &str, contents: &str) -> Result<(), JournalError>;
}
