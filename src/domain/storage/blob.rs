//! Blob container primitive

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Anonymous read access level of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicAccess {
    #[default]
    None,
    Blob,
}

/// A stored blob with its content
#[derive(Debug, Clone, PartialEq)]
pub struct BlobObject {
    pub name: String,
    pub content: Bytes,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

/// Blob primitive required by the blob handler
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Creates the container if absent; returns true when it was created
    async fn create_container_if_not_exists(&self, container: &str) -> Result<bool, DomainError>;

    async fn set_public_access(
        &self,
        container: &str,
        access: PublicAccess,
    ) -> Result<(), DomainError>;

    /// Access level of an existing container, `None` when the container is absent
    async fn public_access(&self, container: &str) -> Result<Option<PublicAccess>, DomainError>;

    /// Writes the object, overwriting any previous content under the same name
    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), DomainError>;

    async fn get_object(
        &self,
        container: &str,
        name: &str,
    ) -> Result<Option<BlobObject>, DomainError>;

    /// Deletes the object; returns false when nothing was there
    async fn delete_object(&self, container: &str, name: &str) -> Result<bool, DomainError>;

    /// Object names in ascending order
    async fn list_objects(&self, container: &str) -> Result<Vec<String>, DomainError>;

    /// Publicly resolvable address of an object
    fn object_url(&self, container: &str, name: &str) -> String;
}
