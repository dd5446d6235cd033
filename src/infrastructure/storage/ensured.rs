//! Process-wide record of resources already provisioned

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{DomainError, ResourceClass};

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Remembers which tables, containers, queues and shares have been ensured.
///
/// The first caller for a resource runs the create-if-missing step; concurrent
/// callers for the same resource wait on that single run. A failed run is not
/// remembered, so the next call tries again.
#[derive(Debug, Clone)]
pub struct EnsuredResources {
    ensured: MokaCache<(ResourceClass, String), ()>,
}

impl Default for EnsuredResources {
    fn default() -> Self {
        Self::new()
    }
}

impl EnsuredResources {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            ensured: MokaCache::new(max_capacity),
        }
    }

    /// Runs `create` once per `(class, name)` for the lifetime of this cache
    pub async fn ensure<F, Fut>(
        &self,
        class: ResourceClass,
        name: &str,
        create: F,
    ) -> Result<(), DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, DomainError>>,
    {
        let key = (class, name.to_string());

        if self.ensured.contains_key(&key) {
            return Ok(());
        }

        self.ensured
            .try_get_with(key, async {
                let created = create().await?;
                debug!(class = %class, name = %name, created, "Resource ensured");
                Ok::<_, DomainError>(())
            })
            .await
            .map_err(|e: Arc<DomainError>| match e.as_ref() {
                DomainError::Storage { status, message } => DomainError::Storage {
                    status: *status,
                    message: message.clone(),
                },
                other => DomainError::storage(other.to_string()),
            })
    }

    pub fn is_ensured(&self, class: ResourceClass, name: &str) -> bool {
        self.ensured.contains_key(&(class, name.to_string()))
    }
}
