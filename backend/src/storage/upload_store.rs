use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::upload::UploadedFile;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Filename {0:?} contains no usable characters")]
    UnsafeFilename(String),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub path: PathBuf,
    pub filename: String,
    pub sha256: String,
}

/// Flat directory of uploaded scans keyed by sanitized filename. A second
/// upload with the same name replaces the first.
#[derive(Debug, Clone)]
pub struct UploadStore {
    upload_dir: PathBuf,
}

impl UploadStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn calculate_digest(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    pub fn store(&self, file: &UploadedFile) -> Result<StoredUpload, StorageError> {
        if file.sanitized_name.is_empty() {
            return Err(StorageError::UnsafeFilename(file.original_name.clone()));
        }

        let path = self.upload_dir.join(&file.sanitized_name);
        std::fs::write(&path, &file.content).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;

        let sha256 = Self::calculate_digest(&file.content);
        log::info!(
            "Stored upload {} ({} bytes, sha256 {})",
            path.display(),
            file.content.len(),
            sha256
        );

        Ok(StoredUpload {
            path,
            filename: file.sanitized_name.clone(),
            sha256,
        })
    }
}
