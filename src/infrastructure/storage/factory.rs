//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::storage::{BlobStore, FileShareStore, QueueStore, TableStore};
use crate::domain::DomainError;

use super::in_memory::{
    InMemoryBlobStore, InMemoryFileShareStore, InMemoryQueueStore, InMemoryTableStore,
};
use super::postgres::{PostgresConfig, PostgresTableStore};

/// Supported table backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Table backend configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// One adapter per storage primitive
#[derive(Clone)]
pub struct StorageBackends {
    pub table: Arc<dyn TableStore>,
    pub blob: Arc<dyn BlobStore>,
    pub queue: Arc<dyn QueueStore>,
    pub file_share: Arc<dyn FileShareStore>,
}

/// Factory for creating storage adapters
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the adapters for the configured table backend; the other primitives are in-memory
    pub async fn create(
        config: &StorageConfig,
        public_base_url: &str,
    ) -> Result<StorageBackends, DomainError> {
        let table: Arc<dyn TableStore> = match config {
            StorageConfig::InMemory => Arc::new(InMemoryTableStore::new()),
            StorageConfig::Postgres(pg_config) => {
                info!("Connecting table store to PostgreSQL");
                Arc::new(PostgresTableStore::connect(pg_config).await?)
            }
        };

        Ok(StorageBackends {
            table,
            ..Self::in_memory(public_base_url)
        })
    }

    /// Creates in-memory adapters for every primitive
    pub fn in_memory(public_base_url: &str) -> StorageBackends {
        StorageBackends {
            table: Arc::new(InMemoryTableStore::new()),
            blob: Arc::new(InMemoryBlobStore::new(public_base_url)),
            queue: Arc::new(InMemoryQueueStore::new()),
            file_share: Arc::new(InMemoryFileShareStore::new()),
        }
    }
}
