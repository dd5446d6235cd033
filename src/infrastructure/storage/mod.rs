//! Storage infrastructure - adapters for the storage primitives

mod ensured;
mod factory;
mod in_memory;
mod postgres;

pub use ensured::EnsuredResources;
pub use factory::{StorageBackends, StorageConfig, StorageFactory, StorageType};
pub use in_memory::{
    InMemoryBlobStore, InMemoryFileShareStore, InMemoryQueueStore, InMemoryTableStore,
};
pub use postgres::{PostgresConfig, PostgresTableStore};
