//! In-memory adapters for every storage primitive

mod blob;
mod file_share;
mod queue;
mod table;

pub use blob::InMemoryBlobStore;
pub use file_share::InMemoryFileShareStore;
pub use queue::InMemoryQueueStore;
pub use table::InMemoryTableStore;
