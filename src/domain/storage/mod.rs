//! Storage domain - the four storage primitives the gateway translates onto

mod blob;
mod file_share;
mod queue;
mod table;

pub use blob::{BlobObject, BlobStore, PublicAccess};
pub use file_share::{FilePath, FileShareStore};
pub use queue::{QueueMessage, QueueStore};
pub use table::{TableEntity, TableStore};

#[cfg(test)]
pub use blob::MockBlobStore;
#[cfg(test)]
pub use file_share::MockFileShareStore;
#[cfg(test)]
pub use queue::MockQueueStore;
#[cfg(test)]
pub use table::MockTableStore;
