//! In-memory table store

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{TableEntity, TableStore};
use crate::domain::{DomainError, RecordKey};

type Table = BTreeMap<RecordKey, TableEntity>;

/// Thread-safe in-memory table store
///
/// Rows are kept ordered by (PartitionKey, RowKey) so scans come back in storage order.
/// Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn missing_table(table: &str) -> DomainError {
        DomainError::storage(format!("Table '{}' does not exist", table))
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if tables.contains_key(table) {
            return Ok(false);
        }

        tables.insert(table.to_string(), Table::new());
        Ok(true)
    }

    async fn get_entity(
        &self,
        table: &str,
        key: &RecordKey,
    ) -> Result<Option<TableEntity>, DomainError> {
        let tables = self.tables.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let rows = tables.get(table).ok_or_else(|| Self::missing_table(table))?;
        Ok(rows.get(key).cloned())
    }

    async fn insert_entity(
        &self,
        table: &str,
        entity: TableEntity,
    ) -> Result<TableEntity, DomainError> {
        let mut tables = self.tables.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Self::missing_table(table))?;
        let key = entity.key();

        if rows.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity '{}' already exists in table '{}'",
                key, table
            )));
        }

        let stored = entity.stamped();
        rows.insert(key, stored.clone());
        Ok(stored)
    }

    async fn upsert_entity(
        &self,
        table: &str,
        entity: TableEntity,
    ) -> Result<TableEntity, DomainError> {
        let mut tables = self.tables.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Self::missing_table(table))?;

        let stored = entity.stamped();
        rows.insert(stored.key(), stored.clone());
        Ok(stored)
    }

    async fn delete_entity(&self, table: &str, key: &RecordKey) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Self::missing_table(table))?;
        Ok(rows.remove(key).is_some())
    }

    async fn query_entities(&self, table: &str) -> Result<Vec<TableEntity>, DomainError> {
        let tables = self.tables.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let rows = tables.get(table).ok_or_else(|| Self::missing_table(table))?;
        Ok(rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn entity(pk: &str, rk: &str, name: &str) -> TableEntity {
        let mut properties = Map::new();
        properties.insert("Name".to_string(), Value::String(name.to_string()));
        TableEntity::new(RecordKey::new(pk, rk), properties)
    }

    async fn store_with_table(table: &str) -> InMemoryTableStore {
        let store = InMemoryTableStore::new();
        store.create_table_if_not_exists(table).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_table_is_idempotent() {
        let store = InMemoryTableStore::new();

        assert!(store.create_table_if_not_exists("Customers").await.unwrap());
        assert!(!store.create_table_if_not_exists("Customers").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = store_with_table("Customers").await;

        let stored = store
            .insert_entity("Customers", entity("C", "1", "Alice"))
            .await
            .unwrap();
        assert!(stored.timestamp.is_some());
        assert!(stored.etag.is_some());

        let found = store
            .get_entity("Customers", &RecordKey::new("C", "1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.properties["Name"], json!("Alice"));
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let store = store_with_table("Customers").await;

        store
            .insert_entity("Customers", entity("C", "1", "Alice"))
            .await
            .unwrap();
        let result = store
            .insert_entity("Customers", entity("C", "1", "Bob"))
            .await;

        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let store = store_with_table("Customers").await;

        store
            .upsert_entity("Customers", entity("C", "1", "Alice"))
            .await
            .unwrap();
        store
            .upsert_entity("Customers", entity("C", "1", "Bob"))
            .await
            .unwrap();

        let rows = store.query_entities("Customers").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].properties["Name"], json!("Bob"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = store_with_table("Customers").await;

        let deleted = store
            .delete_entity("Customers", &RecordKey::new("C", "404"))
            .await
            .unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_query_is_ordered_by_key() {
        let store = store_with_table("Customers").await;

        for (pk, rk) in [("B", "1"), ("A", "2"), ("A", "1")] {
            store
                .insert_entity("Customers", entity(pk, rk, "x"))
                .await
                .unwrap();
        }

        let keys: Vec<String> = store
            .query_entities("Customers")
            .await
            .unwrap()
            .iter()
            .map(|e| e.key().to_string())
            .collect();
        assert_eq!(keys, vec!["A/1", "A/2", "B/1"]);
    }

    #[tokio::test]
    async fn test_missing_table_is_storage_error() {
        let store = InMemoryTableStore::new();

        let result = store.query_entities("Nope").await;
        assert!(matches!(result.unwrap_err(), DomainError::Storage { .. }));
    }
}
