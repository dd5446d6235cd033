//! Domain layer - records, storage primitives and errors

pub mod error;
pub mod record;
pub mod storage;

pub use error::DomainError;
pub use record::{
    decode_record, decode_record_bytes, decode_records, encode_record, resource_name, Customer,
    Order, Product, Record, RecordKey, ResourceClass,
};
pub use storage::{
    BlobObject, BlobStore, FilePath, FileShareStore, PublicAccess, QueueMessage, QueueStore,
    TableEntity, TableStore,
};
