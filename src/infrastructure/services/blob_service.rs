//! Blob handler - upload, list, delete and public download over a blob container

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::storage::{BlobObject, BlobStore, PublicAccess};
use crate::domain::{DomainError, ResourceClass};
use crate::infrastructure::storage::EnsuredResources;

pub const DEFAULT_BLOB_EXTENSION: &str = "jpg";

/// Payload of a blob upload
#[derive(Debug, Clone, Default)]
pub struct BlobUpload {
    pub content: Bytes,
    /// Original file name, used for the extension and content type
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    /// Caller-chosen blob name; generated when absent
    pub blob_name: Option<String>,
}

impl BlobUpload {
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_blob_name(mut self, blob_name: impl Into<String>) -> Self {
        self.blob_name = Some(blob_name.into());
        self
    }
}

/// Upload response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadedBlob {
    #[serde(rename = "ImageUrl")]
    pub url: String,
    pub blob_name: String,
}

pub struct BlobService {
    store: Arc<dyn BlobStore>,
    ensured: EnsuredResources,
    default_extension: String,
}

impl BlobService {
    pub fn new(store: Arc<dyn BlobStore>, ensured: EnsuredResources) -> Self {
        Self {
            store,
            ensured,
            default_extension: DEFAULT_BLOB_EXTENSION.to_string(),
        }
    }

    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        self.default_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Creates the container if missing and opens it for anonymous reads
    async fn ensure_container(&self, container: &str) -> Result<(), DomainError> {
        validate_container(container)?;

        let store = self.store.clone();
        self.ensured
            .ensure(ResourceClass::Blob, container, || async move {
                let created = store.create_container_if_not_exists(container).await?;
                store
                    .set_public_access(container, PublicAccess::Blob)
                    .await?;
                Ok(created)
            })
            .await
    }

    /// Stores the payload under a fresh or caller-chosen name and returns its public URL
    pub async fn upload(
        &self,
        container: &str,
        upload: BlobUpload,
    ) -> Result<UploadedBlob, DomainError> {
        self.ensure_container(container).await?;

        let blob_name = match upload.blob_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => generate_blob_name(upload.file_name.as_deref(), &self.default_extension),
        };

        let content_type = upload
            .content_type
            .filter(|ct| !ct.trim().is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| {
                mime_guess::from_path(&blob_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        let size = upload.content.len();
        self.store
            .put_object(container, &blob_name, upload.content, &content_type)
            .await?;

        info!(
            container = %container,
            blob_name = %blob_name,
            size,
            content_type = %content_type,
            "Uploaded blob"
        );

        Ok(UploadedBlob {
            url: self.store.object_url(container, &blob_name),
            blob_name,
        })
    }

    /// Idempotent delete
    pub async fn delete(&self, container: &str, blob_name: &str) -> Result<(), DomainError> {
        validate_container(container)?;

        let existed = self.store.delete_object(container, blob_name).await?;
        info!(container = %container, blob_name = %blob_name, existed, "Deleted blob");

        Ok(())
    }

    pub async fn list(&self, container: &str) -> Result<Vec<String>, DomainError> {
        self.ensure_container(container).await?;

        let names = self.store.list_objects(container).await?;
        debug!(container = %container, count = names.len(), "Listed blobs");

        Ok(names)
    }

    /// Anonymous read; only public containers are served
    pub async fn download(
        &self,
        container: &str,
        blob_name: &str,
    ) -> Result<BlobObject, DomainError> {
        let not_found = || {
            DomainError::not_found(format!(
                "Blob '{}' not found in container '{}'",
                blob_name, container
            ))
        };

        match self.store.public_access(container).await? {
            Some(PublicAccess::Blob) => {}
            _ => return Err(not_found()),
        }

        self.store
            .get_object(container, blob_name)
            .await?
            .ok_or_else(not_found)
    }
}

fn validate_container(container: &str) -> Result<(), DomainError> {
    if container.trim().is_empty() {
        return Err(DomainError::validation("Container name must not be empty"));
    }
    Ok(())
}

/// `<uuid>.<ext>` where the extension comes from the original file name
pub fn generate_blob_name(file_name: Option<&str>, default_extension: &str) -> String {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.trim())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(default_extension);

    format!("{}.{}", Uuid::new_v4(), extension.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::MockBlobStore;
    use crate::infrastructure::storage::InMemoryBlobStore;

    fn in_memory_service() -> BlobService {
        BlobService::new(
            Arc::new(InMemoryBlobStore::new("http://localhost:8080/api/blob")),
            EnsuredResources::new(),
        )
    }

    #[test]
    fn test_generate_blob_name() {
        let name = generate_blob_name(Some("photo.PNG"), "jpg");
        assert!(name.ends_with(".png"));
        assert!(Uuid::parse_str(name.trim_end_matches(".png")).is_ok());

        assert!(generate_blob_name(None, "jpg").ends_with(".jpg"));
        assert!(generate_blob_name(Some("README"), "jpg").ends_with(".jpg"));
        assert!(generate_blob_name(Some("weird.ex t"), "bin").ends_with(".bin"));
    }

    #[test]
    fn test_generated_names_are_unique() {
        assert_ne!(
            generate_blob_name(Some("a.jpg"), "jpg"),
            generate_blob_name(Some("a.jpg"), "jpg")
        );
    }

    #[tokio::test]
    async fn test_upload_list_delete() {
        let service = in_memory_service();

        let uploaded = service
            .upload("images", BlobUpload::new(vec![1u8, 2, 3]).with_file_name("cat.png"))
            .await
            .unwrap();
        assert!(uploaded.blob_name.ends_with(".png"));
        assert_eq!(
            uploaded.url,
            format!("http://localhost:8080/api/blob/images/{}", uploaded.blob_name)
        );

        let names = service.list("images").await.unwrap();
        assert_eq!(names, vec![uploaded.blob_name.clone()]);

        service.delete("images", &uploaded.blob_name).await.unwrap();
        service.delete("images", &uploaded.blob_name).await.unwrap();
        assert!(service.list("images").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_with_chosen_name_overwrites() {
        let service = in_memory_service();

        for content in [&b"first"[..], b"second"] {
            service
                .upload(
                    "docs",
                    BlobUpload::new(Bytes::copy_from_slice(content)).with_blob_name("a.txt"),
                )
                .await
                .unwrap();
        }

        let blob = service.download("docs", "a.txt").await.unwrap();
        assert_eq!(blob.content, Bytes::from_static(b"second"));
        assert_eq!(blob.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_list_new_container_is_empty() {
        let service = in_memory_service();
        assert!(service.list("fresh").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_in_missing_container_succeeds() {
        let service = in_memory_service();
        service.delete("nowhere", "ghost.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let service = in_memory_service();
        service.list("images").await.unwrap();

        assert!(service.download("images", "nope.jpg").await.unwrap_err().is_not_found());
        assert!(service.download("other", "nope.jpg").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_private_container_is_not_served() {
        let mut store = MockBlobStore::new();
        store
            .expect_public_access()
            .returning(|_| Ok(Some(PublicAccess::None)));
        store.expect_get_object().never();

        let service = BlobService::new(Arc::new(store), EnsuredResources::new());
        let err = service.download("private", "a.jpg").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_container_opened_once() {
        let mut store = MockBlobStore::new();
        store
            .expect_create_container_if_not_exists()
            .times(1)
            .returning(|_| Ok(true));
        store
            .expect_set_public_access()
            .withf(|_, access| *access == PublicAccess::Blob)
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_list_objects().times(2).returning(|_| Ok(Vec::new()));

        let service = BlobService::new(Arc::new(store), EnsuredResources::new());
        service.list("images").await.unwrap();
        service.list("images").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_container_name_rejected() {
        let service = in_memory_service();
        let err = service.list(" ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
