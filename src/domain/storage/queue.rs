//! Message queue primitive

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// A message as returned by the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueMessage {
    pub message_id: String,
    pub queue_name: String,
    pub content: String,
    pub inserted_on: DateTime<Utc>,
}

/// Queue primitive required by the queue handler
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn create_queue_if_not_exists(&self, queue: &str) -> Result<bool, DomainError>;

    async fn send_message(&self, queue: &str, content: String)
        -> Result<QueueMessage, DomainError>;

    /// Removes and returns the next message, if any
    async fn receive_message(&self, queue: &str) -> Result<Option<QueueMessage>, DomainError>;
}
