//! In-memory queue store

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::storage::{QueueMessage, QueueStore};
use crate::domain::DomainError;

/// FIFO queues held in memory
#[derive(Debug, Default)]
pub struct InMemoryQueueStore {
    queues: Mutex<HashMap<String, VecDeque<QueueMessage>>>,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn create_queue_if_not_exists(&self, queue: &str) -> Result<bool, DomainError> {
        let mut queues = self
            .queues
            .lock()
            .map_err(|e| DomainError::storage(format!("Failed to acquire lock: {}", e)))?;

        if queues.contains_key(queue) {
            return Ok(false);
        }

        queues.insert(queue.to_string(), VecDeque::new());
        Ok(true)
    }

    async fn send_message(
        &self,
        queue: &str,
        content: String,
    ) -> Result<QueueMessage, DomainError> {
        let mut queues = self
            .queues
            .lock()
            .map_err(|e| DomainError::storage(format!("Failed to acquire lock: {}", e)))?;

        let messages = queues
            .get_mut(queue)
            .ok_or_else(|| DomainError::storage(format!("Queue '{}' does not exist", queue)))?;

        let message = QueueMessage {
            message_id: Uuid::new_v4().to_string(),
            queue_name: queue.to_string(),
            content,
            inserted_on: Utc::now(),
        };
        messages.push_back(message.clone());
        Ok(message)
    }

    async fn receive_message(&self, queue: &str) -> Result<Option<QueueMessage>, DomainError> {
        let mut queues = self
            .queues
            .lock()
            .map_err(|e| DomainError::storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(queues.get_mut(queue).and_then(VecDeque::pop_front))
    }
}
