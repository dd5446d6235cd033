//! In-memory file share store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::storage::{FilePath, FileShareStore};
use crate::domain::DomainError;

/// File shares held in memory, files keyed by their path relative to the share root
#[derive(Debug, Default)]
pub struct InMemoryFileShareStore {
    shares: RwLock<HashMap<String, HashMap<String, Bytes>>>,
}

impl InMemoryFileShareStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileShareStore for InMemoryFileShareStore {
    async fn create_share_if_not_exists(&self, share: &str) -> Result<bool, DomainError> {
        let mut shares = self.shares.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if shares.contains_key(share) {
            return Ok(false);
        }

        shares.insert(share.to_string(), HashMap::new());
        Ok(true)
    }

    async fn put_file(&self, path: &FilePath, content: Bytes) -> Result<(), DomainError> {
        let mut shares = self.shares.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let files = shares.get_mut(&path.share).ok_or_else(|| {
            DomainError::storage(format!("Share '{}' does not exist", path.share))
        })?;

        files.insert(path.relative(), content);
        Ok(())
    }

    async fn get_file(&self, path: &FilePath) -> Result<Option<Bytes>, DomainError> {
        let shares = self.shares.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(shares
            .get(&path.share)
            .and_then(|files| files.get(&path.relative()))
            .cloned())
    }
}
