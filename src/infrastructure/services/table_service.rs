//! Table-entity handler - CRUD over the partitioned table primitive

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::storage::TableStore;
use crate::domain::{DomainError, RecordKey, ResourceClass};
use crate::infrastructure::storage::EnsuredResources;

use super::record_registry::{RecordCodec, RecordRegistry};

/// Translates table requests onto a [`TableStore`]
///
/// Every operation resolves the resource name against the registry first, then
/// ensures the logical table exists before touching rows.
pub struct TableService {
    store: Arc<dyn TableStore>,
    registry: Arc<RecordRegistry>,
    ensured: EnsuredResources,
}

impl TableService {
    pub fn new(
        store: Arc<dyn TableStore>,
        registry: Arc<RecordRegistry>,
        ensured: EnsuredResources,
    ) -> Self {
        Self {
            store,
            registry,
            ensured,
        }
    }

    pub fn registry(&self) -> &RecordRegistry {
        &self.registry
    }

    async fn open(&self, resource: &str) -> Result<&RecordCodec, DomainError> {
        let codec = self.registry.resolve(resource)?;
        self.ensure_table(resource).await?;
        Ok(codec)
    }

    async fn ensure_table(&self, table: &str) -> Result<(), DomainError> {
        let store = self.store.clone();
        self.ensured
            .ensure(ResourceClass::Table, table, || async move {
                store.create_table_if_not_exists(table).await
            })
            .await
    }

    /// All records of the table in storage order
    pub async fn list(&self, resource: &str) -> Result<Vec<Value>, DomainError> {
        let codec = self.open(resource).await?;
        let entities = self.store.query_entities(resource).await?;

        debug!(resource = %resource, count = entities.len(), "Listed table entities");

        entities
            .into_iter()
            .map(|entity| codec.project(entity))
            .collect()
    }

    /// Point lookup; `NotFound` when the key is absent
    pub async fn get(&self, resource: &str, key: &RecordKey) -> Result<Value, DomainError> {
        let codec = self.open(resource).await?;

        let entity = self
            .store
            .get_entity(resource, key)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Entity '{}' not found in table '{}'",
                    key, resource
                ))
            })?;

        codec.project(entity)
    }

    /// Strict insert; `Conflict` when the key already exists
    pub async fn add(&self, resource: &str, body: &[u8]) -> Result<Value, DomainError> {
        let codec = self.registry.resolve(resource)?;
        let entity = codec.decode(body)?;
        let key = entity.key();

        self.ensure_table(resource).await?;
        let stored = self.store.insert_entity(resource, entity).await?;

        info!(resource = %resource, key = %key, "Added table entity");
        codec.project(stored)
    }

    /// Unconditional insert-or-replace
    pub async fn update(&self, resource: &str, body: &[u8]) -> Result<Value, DomainError> {
        let codec = self.registry.resolve(resource)?;
        let entity = codec.decode(body)?;
        let key = entity.key();

        self.ensure_table(resource).await?;
        let stored = self.store.upsert_entity(resource, entity).await?;

        info!(resource = %resource, key = %key, "Upserted table entity");
        codec.project(stored)
    }

    /// Registered table resource names, sorted
    pub fn resources(&self) -> Vec<String> {
        self.registry
            .resources()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Round-trip to the table store, used by readiness checks
    pub async fn probe(&self) -> Result<(), DomainError> {
        match self.registry.resources().first() {
            Some(resource) => self.list(resource).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// Idempotent delete
    pub async fn delete(&self, resource: &str, key: &RecordKey) -> Result<(), DomainError> {
        self.open(resource).await?;

        let existed = self.store.delete_entity(resource, key).await?;
        info!(resource = %resource, key = %key, existed, "Deleted table entity");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::MockTableStore;
    use crate::infrastructure::storage::InMemoryTableStore;
    use mockall::predicate::eq;
    use serde_json::json;

    fn service_with(store: Arc<dyn TableStore>) -> TableService {
        TableService::new(
            store,
            Arc::new(RecordRegistry::with_defaults()),
            EnsuredResources::new(),
        )
    }

    fn in_memory_service() -> TableService {
        service_with(Arc::new(InMemoryTableStore::new()))
    }

    fn alice_body(name: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "PartitionKey": "C",
            "RowKey": "1",
            "Name": name
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_on_new_table_is_empty() {
        let service = in_memory_service();
        assert!(service.list("Customers").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let service = in_memory_service();

        let created = service.add("Customers", &alice_body("Alice")).await.unwrap();
        assert_eq!(created["Name"], "Alice");
        assert!(created.get("Timestamp").is_some());

        let found = service
            .get("Customers", &RecordKey::new("C", "1"))
            .await
            .unwrap();
        assert_eq!(found["Name"], "Alice");
    }

    #[tokio::test]
    async fn test_add_twice_conflicts() {
        let service = in_memory_service();

        service.add("Customers", &alice_body("Alice")).await.unwrap();
        let err = service
            .add("Customers", &alice_body("Alice again"))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_twice_keeps_last_write() {
        let service = in_memory_service();

        service.update("Customers", &alice_body("First")).await.unwrap();
        service.update("Customers", &alice_body("Second")).await.unwrap();

        let all = service.list("Customers").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["Name"], "Second");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = in_memory_service();

        let err = service
            .get("Customers", &RecordKey::new("C", "404"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_succeeds() {
        let service = in_memory_service();

        service
            .delete("Orders", &RecordKey::new("O", "404"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_rejects_bad_bodies() {
        let service = in_memory_service();

        for body in [&b""[..], b"   ", b"{oops", b"[]", br#"{"Name":"no keys"}"#] {
            let err = service.add("Customers", body).await.unwrap_err();
            assert!(
                matches!(err, DomainError::Validation { .. }),
                "body {:?} gave {:?}",
                String::from_utf8_lossy(body),
                err
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_resource_never_touches_store() {
        let mut store = MockTableStore::new();
        store.expect_create_table_if_not_exists().never();

        let service = service_with(Arc::new(store));
        let err = service.list("Invoices").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_table_is_ensured_once() {
        let mut store = MockTableStore::new();
        store
            .expect_create_table_if_not_exists()
            .with(eq("Customers"))
            .times(1)
            .returning(|_| Ok(true));
        store
            .expect_query_entities()
            .times(2)
            .returning(|_| Ok(Vec::new()));

        let service = service_with(Arc::new(store));
        service.list("Customers").await.unwrap();
        service.list("Customers").await.unwrap();
    }

    #[tokio::test]
    async fn test_store_errors_are_surfaced() {
        let mut store = MockTableStore::new();
        store
            .expect_create_table_if_not_exists()
            .returning(|_| Ok(false));
        store
            .expect_get_entity()
            .returning(|_, _| Err(DomainError::storage("disk on fire")));

        let service = service_with(Arc::new(store));
        let err = service
            .get("Customers", &RecordKey::new("C", "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
