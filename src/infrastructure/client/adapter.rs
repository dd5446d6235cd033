//! Older storage-service interface backed by the gateway client

use async_trait::async_trait;
use bytes::Bytes;

use super::file::FileContent;
use super::gateway_client::GatewayClient;
use crate::domain::{DomainError, Record};

/// Storage operations in the shape callers used before the gateway existed
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn get_all_entities<T: Record>(&self) -> Result<Vec<T>, DomainError>;

    async fn get_entity<T: Record>(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<T>, DomainError>;

    async fn add_entity<T: Record>(&self, entity: &T) -> Result<T, DomainError>;

    async fn update_entity<T: Record>(&self, entity: &T) -> Result<T, DomainError>;

    async fn delete_entity<T: Record>(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<(), DomainError>;

    async fn upload_image(
        &self,
        file: &FileContent,
        container: &str,
    ) -> Result<String, DomainError>;

    async fn upload_file(&self, file: &FileContent, container: &str)
        -> Result<String, DomainError>;

    async fn delete_blob(&self, blob_name: &str, container: &str) -> Result<(), DomainError>;

    async fn send_message(&self, queue: &str, message: &str) -> Result<(), DomainError>;

    async fn receive_message(&self, queue: &str) -> Result<Option<String>, DomainError>;

    async fn upload_to_file_share(
        &self,
        file: &FileContent,
        share: &str,
        directory: Option<&str>,
    ) -> Result<String, DomainError>;

    async fn download_from_file_share(
        &self,
        share: &str,
        file_name: &str,
        directory: Option<&str>,
    ) -> Result<Bytes, DomainError>;
}

/// [`StorageService`] that forwards every call to a [`GatewayClient`]
#[derive(Debug, Clone)]
pub struct GatewayClientAdapter {
    client: GatewayClient,
}

impl GatewayClientAdapter {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }
}

#[async_trait]
impl StorageService for GatewayClientAdapter {
    async fn get_all_entities<T: Record>(&self) -> Result<Vec<T>, DomainError> {
        self.client.get_all().await
    }

    async fn get_entity<T: Record>(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<T>, DomainError> {
        self.client.get(partition_key, row_key).await
    }

    async fn add_entity<T: Record>(&self, entity: &T) -> Result<T, DomainError> {
        self.client.add(entity).await
    }

    async fn update_entity<T: Record>(&self, entity: &T) -> Result<T, DomainError> {
        self.client.update(entity).await
    }

    async fn delete_entity<T: Record>(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<(), DomainError> {
        self.client.delete::<T>(partition_key, row_key).await
    }

    async fn upload_image(
        &self,
        file: &FileContent,
        container: &str,
    ) -> Result<String, DomainError> {
        self.client.upload_blob(container, file).await
    }

    async fn upload_file(
        &self,
        file: &FileContent,
        container: &str,
    ) -> Result<String, DomainError> {
        self.client.upload_file(container, file).await
    }

    async fn delete_blob(&self, blob_name: &str, container: &str) -> Result<(), DomainError> {
        self.client.delete_blob(container, blob_name).await
    }

    async fn send_message(&self, queue: &str, message: &str) -> Result<(), DomainError> {
        self.client.send_message(queue, message).await
    }

    async fn receive_message(&self, queue: &str) -> Result<Option<String>, DomainError> {
        self.client.receive_message(queue).await
    }

    async fn upload_to_file_share(
        &self,
        file: &FileContent,
        share: &str,
        directory: Option<&str>,
    ) -> Result<String, DomainError> {
        self.client
            .upload_to_file_share(share, directory, file)
            .await
    }

    async fn download_from_file_share(
        &self,
        share: &str,
        file_name: &str,
        directory: Option<&str>,
    ) -> Result<Bytes, DomainError> {
        self.client
            .download_from_file_share(share, directory, file_name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Order;
    use crate::infrastructure::client::http_client::mock::MockHttpClient;
    use crate::infrastructure::client::http_client::{HttpResponse, RequestBody};
    use reqwest::Method;
    use std::sync::Arc;

    const BASE: &str = "http://gateway.test/api";

    fn adapter_with(http: Arc<MockHttpClient>) -> GatewayClientAdapter {
        GatewayClientAdapter::new(GatewayClient::with_http_client(http, BASE).unwrap())
    }

    #[tokio::test]
    async fn test_entity_calls_route_to_record_table() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_response(
                    Method::GET,
                    format!("{}/table/Orders", BASE),
                    HttpResponse::new(200, "[]"),
                )
                .with_response(
                    Method::DELETE,
                    format!("{}/table/Orders/O/1", BASE),
                    HttpResponse::new(204, ""),
                ),
        );
        let adapter = adapter_with(http.clone());

        let orders: Vec<Order> = adapter.get_all_entities().await.unwrap();
        assert!(orders.is_empty());
        adapter.delete_entity::<Order>("O", "1").await.unwrap();

        assert_eq!(http.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_blob_argument_order() {
        let http = Arc::new(MockHttpClient::new().with_response(
            Method::DELETE,
            format!("{}/blob/images/cat.jpg", BASE),
            HttpResponse::new(204, ""),
        ));
        let adapter = adapter_with(http.clone());

        adapter.delete_blob("cat.jpg", "images").await.unwrap();
        assert_eq!(http.requests()[0].method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_send_message_posts_text() {
        let http = Arc::new(MockHttpClient::new().with_response(
            Method::POST,
            format!("{}/queue/order-notifications", BASE),
            HttpResponse::new(
                201,
                r#"{"MessageId":"m","QueueName":"order-notifications","Content":"hi","InsertedOn":"2024-01-01T00:00:00Z"}"#,
            ),
        ));
        let adapter = adapter_with(http.clone());

        adapter
            .send_message("order-notifications", "hi")
            .await
            .unwrap();
        assert_eq!(
            http.requests()[0].body,
            RequestBody::Text("hi".to_string())
        );
    }

    #[tokio::test]
    async fn test_download_from_file_share_without_directory() {
        let http = Arc::new(MockHttpClient::new().with_response(
            Method::GET,
            format!("{}/fileshare/docs/a.txt", BASE),
            HttpResponse::new(200, "abc"),
        ));
        let adapter = adapter_with(http);

        let bytes = adapter
            .download_from_file_share("docs", "a.txt", None)
            .await
            .unwrap();
        assert_eq!(bytes, Bytes::from_static(b"abc"));
    }
}
