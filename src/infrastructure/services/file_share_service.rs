//! File-share handler

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::storage::{FilePath, FileShareStore};
use crate::domain::{DomainError, ResourceClass};
use crate::infrastructure::storage::EnsuredResources;

/// Upload response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredFile {
    pub file_name: String,
    pub path: String,
}

/// A downloaded file with its guessed content type
#[derive(Debug, Clone, PartialEq)]
pub struct SharedFile {
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

pub struct FileShareService {
    store: Arc<dyn FileShareStore>,
    ensured: EnsuredResources,
}

impl FileShareService {
    pub fn new(store: Arc<dyn FileShareStore>, ensured: EnsuredResources) -> Self {
        Self { store, ensured }
    }

    async fn ensure_share(&self, share: &str) -> Result<(), DomainError> {
        let store = self.store.clone();
        self.ensured
            .ensure(ResourceClass::FileShare, share, || async move {
                store.create_share_if_not_exists(share).await
            })
            .await
    }

    /// Writes the file, overwriting any existing file at the same path
    pub async fn upload(&self, path: FilePath, content: Bytes) -> Result<StoredFile, DomainError> {
        path.validate()?;
        self.ensure_share(&path.share).await?;

        let size = content.len();
        self.store.put_file(&path, content).await?;

        info!(path = %path, size, "Uploaded file to share");

        Ok(StoredFile {
            path: path.relative(),
            file_name: path.file_name,
        })
    }

    pub async fn download(&self, path: FilePath) -> Result<SharedFile, DomainError> {
        path.validate()?;
        self.ensure_share(&path.share).await?;

        let content = self
            .store
            .get_file(&path)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("File '{}' not found", path)))?;

        Ok(SharedFile {
            content_type: mime_guess::from_path(&path.file_name)
                .first_or_octet_stream()
                .to_string(),
            file_name: path.file_name,
            content,
        })
    }
}
