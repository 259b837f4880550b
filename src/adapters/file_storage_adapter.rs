//! Blob storage as one JSON file per key inside a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::error::JournalError;
use crate::ports::storage_port::StoragePort;

pub struct FileStorageAdapter {
    base_path: PathBuf,
}

impl FileStorageAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, JournalError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(JournalError::persistence(
                key,
                "key may only contain letters, digits, '_' and '-'",
            ));
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

impl StoragePort for FileStorageAdapter {
    fn read_blob(&self, key: &str) -> Result<Option<String>, JournalError> {
        let path = self.blob_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(JournalError::persistence(
                key,
                format!("failed to read {}: {}", path.display(), e),
            )),
        }
    }

    /// Writes a sibling temp file and renames it over the blob, so readers see
    /// either the previous snapshot or the new one.
    fn write_blob(&mut self, key: &str, contents: &str) -> Result<(), JournalError> {
        let path = self.blob_path(key)?;
        fs::create_dir_all(&self.base_path).map_err(|e| {
            JournalError::persistence(
                key,
                format!("failed to create {}: {}", self.base_path.display(), e),
            )
        })?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|e| {
            JournalError::persistence(key, format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            JournalError::persistence(key, format!("failed to replace {}: {}", path.display(), e))
        })?;

        log::debug!("wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}
