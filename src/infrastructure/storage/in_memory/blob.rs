//! In-memory blob store

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::Url;

use crate::domain::storage::{BlobObject, BlobStore, PublicAccess};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Container {
    access: PublicAccess,
    objects: BTreeMap<String, BlobObject>,
}

/// Thread-safe in-memory blob store
///
/// Object URLs are built from `public_base_url`, which should point at whatever
/// serves `GET {container}/{name}` (the gateway's own blob download route by default).
#[derive(Debug)]
pub struct InMemoryBlobStore {
    public_base_url: String,
    containers: RwLock<HashMap<String, Container>>,
}

impl InMemoryBlobStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        let public_base_url: String = public_base_url.into();

        Self {
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            containers: RwLock::new(HashMap::new()),
        }
    }

    fn missing_container(container: &str) -> DomainError {
        DomainError::storage(format!("Container '{}' does not exist", container))
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn create_container_if_not_exists(&self, container: &str) -> Result<bool, DomainError> {
        let mut containers = self.containers.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if containers.contains_key(container) {
            return Ok(false);
        }

        containers.insert(container.to_string(), Container::default());
        Ok(true)
    }

    async fn set_public_access(
        &self,
        container: &str,
        access: PublicAccess,
    ) -> Result<(), DomainError> {
        let mut containers = self.containers.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let entry = containers
            .get_mut(container)
            .ok_or_else(|| Self::missing_container(container))?;
        entry.access = access;
        Ok(())
    }

    async fn public_access(&self, container: &str) -> Result<Option<PublicAccess>, DomainError> {
        let containers = self.containers.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(containers.get(container).map(|c| c.access))
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), DomainError> {
        let mut containers = self.containers.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let entry = containers
            .get_mut(container)
            .ok_or_else(|| Self::missing_container(container))?;

        entry.objects.insert(
            name.to_string(),
            BlobObject {
                name: name.to_string(),
                content,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_object(
        &self,
        container: &str,
        name: &str,
    ) -> Result<Option<BlobObject>, DomainError> {
        let containers = self.containers.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(containers
            .get(container)
            .and_then(|c| c.objects.get(name))
            .cloned())
    }

    async fn delete_object(&self, container: &str, name: &str) -> Result<bool, DomainError> {
        let mut containers = self.containers.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(containers
            .get_mut(container)
            .map(|c| c.objects.remove(name).is_some())
            .unwrap_or(false))
    }

    async fn list_objects(&self, container: &str) -> Result<Vec<String>, DomainError> {
        let containers = self.containers.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let entry = containers
            .get(container)
            .ok_or_else(|| Self::missing_container(container))?;
        Ok(entry.objects.keys().cloned().collect())
    }

    /// Container and name are percent-encoded as single path segments
    fn object_url(&self, container: &str, name: &str) -> String {
        let Ok(mut url) = Url::parse(&self.public_base_url) else {
            return format!("{}/{}/{}", self.public_base_url, container, name);
        };

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend([container, name]);
        }
        url.to_string()
    }
}
