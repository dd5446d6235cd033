//! Resource handlers - translate gateway operations onto storage primitives

mod blob_service;
mod file_share_service;
mod queue_service;
mod record_registry;
mod table_service;

pub use blob_service::{
    generate_blob_name, BlobService, BlobUpload, UploadedBlob, DEFAULT_BLOB_EXTENSION,
};
pub use file_share_service::{FileShareService, SharedFile, StoredFile};
pub use queue_service::QueueService;
pub use record_registry::{RecordCodec, RecordRegistry};
pub use table_service::TableService;
