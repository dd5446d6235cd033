//! Queue handler

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::storage::{QueueMessage, QueueStore};
use crate::domain::{DomainError, ResourceClass};
use crate::infrastructure::storage::EnsuredResources;

pub struct QueueService {
    store: Arc<dyn QueueStore>,
    ensured: EnsuredResources,
}

impl QueueService {
    pub fn new(store: Arc<dyn QueueStore>, ensured: EnsuredResources) -> Self {
        Self { store, ensured }
    }

    async fn ensure_queue(&self, queue: &str) -> Result<(), DomainError> {
        if queue.trim().is_empty() {
            return Err(DomainError::validation("Queue name must not be empty"));
        }

        let store = self.store.clone();
        self.ensured
            .ensure(ResourceClass::Queue, queue, || async move {
                store.create_queue_if_not_exists(queue).await
            })
            .await
    }

    /// Enqueues a non-empty text message
    pub async fn send(&self, queue: &str, content: String) -> Result<QueueMessage, DomainError> {
        if content.is_empty() {
            return Err(DomainError::validation("Message content is required"));
        }

        self.ensure_queue(queue).await?;
        let message = self.store.send_message(queue, content).await?;

        info!(queue = %queue, message_id = %message.message_id, "Sent queue message");
        Ok(message)
    }

    /// Dequeues the next message, `None` when the queue is empty
    pub async fn receive(&self, queue: &str) -> Result<Option<QueueMessage>, DomainError> {
        self.ensure_queue(queue).await?;

        let message = self.store.receive_message(queue).await?;
        debug!(queue = %queue, received = message.is_some(), "Received from queue");

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::MockQueueStore;
    use crate::infrastructure::storage::InMemoryQueueStore;

    fn in_memory_service() -> QueueService {
        QueueService::new(Arc::new(InMemoryQueueStore::new()), EnsuredResources::new())
    }

    #[tokio::test]
    async fn test_send_then_receive() {
        let service = in_memory_service();

        let sent = service.send("orders", "order-1".to_string()).await.unwrap();
        assert_eq!(sent.queue_name, "orders");
        assert_eq!(sent.content, "order-1");

        let received = service.receive("orders").await.unwrap().unwrap();
        assert_eq!(received.message_id, sent.message_id);
        assert!(service.receive("orders").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_receive_from_new_queue_is_none() {
        let service = in_memory_service();
        assert!(service.receive("fresh").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let mut store = MockQueueStore::new();
        store.expect_send_message().never();

        let service = QueueService::new(Arc::new(store), EnsuredResources::new());
        let err = service.send("orders", String::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockQueueStore::new();
        store.expect_create_queue_if_not_exists().returning(|_| Ok(true));
        store
            .expect_send_message()
            .returning(|_, _| Err(DomainError::storage("queue offline")));

        let service = QueueService::new(Arc::new(store), EnsuredResources::new());
        let err = service.send("orders", "x".to_string()).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
