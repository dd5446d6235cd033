//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{
    BlobService, FileShareService, QueueService, RecordRegistry, TableService,
};
use crate::infrastructure::storage::{EnsuredResources, StorageBackends};

/// Resource handlers shared by every request
#[derive(Clone)]
pub struct AppState {
    pub table_service: Arc<TableService>,
    pub blob_service: Arc<BlobService>,
    pub queue_service: Arc<QueueService>,
    pub file_share_service: Arc<FileShareService>,
}

impl AppState {
    /// Wires the handlers over one set of storage adapters with a shared ensured-resource cache
    pub fn new(
        backends: StorageBackends,
        registry: RecordRegistry,
        default_blob_extension: &str,
    ) -> Self {
        let ensured = EnsuredResources::new();

        Self {
            table_service: Arc::new(TableService::new(
                backends.table,
                Arc::new(registry),
                ensured.clone(),
            )),
            blob_service: Arc::new(
                BlobService::new(backends.blob, ensured.clone())
                    .with_default_extension(default_blob_extension),
            ),
            queue_service: Arc::new(QueueService::new(backends.queue, ensured.clone())),
            file_share_service: Arc::new(FileShareService::new(backends.file_share, ensured)),
        }
    }
}
