//! In-process blob storage.

use std::collections::HashMap;

use crate::domain::error::JournalError;
use crate::ports::storage_port::StoragePort;

/// Keeps blobs in a map for the lifetime of the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageAdapter {
    blobs: HashMap<String, String>,
}

impl MemoryStorageAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, contents: &str) -> Self {
        let mut adapter = Self::new();
        adapter.blobs.insert(key.to_string(), contents.to_string());
        adapter
    }
}

impl StoragePort for MemoryStorageAdapter {
    fn read_blob(&self, key: &str) -> Result<Option<String>, JournalError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write_blob(&mut self, key: &str, contents: &str) -> Result<(), JournalError> {
        self.blobs.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}
