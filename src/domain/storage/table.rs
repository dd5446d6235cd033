//! Partitioned key-value table primitive

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

#[cfg(test)]
use mockall::automock;

use crate::domain::record::{decode_record, encode_record, Record, RecordKey};
use crate::domain::DomainError;

const PARTITION_KEY: &str = "PartitionKey";
const ROW_KEY: &str = "RowKey";
const TIMESTAMP: &str = "Timestamp";
const ETAG: &str = "ETag";

/// A schemaless table row: the composite key, store metadata and the remaining properties
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub etag: Option<String>,
    pub properties: Map<String, Value>,
}

impl TableEntity {
    pub fn new(key: RecordKey, properties: Map<String, Value>) -> Self {
        Self {
            partition_key: key.partition_key,
            row_key: key.row_key,
            timestamp: None,
            etag: None,
            properties,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.partition_key, &self.row_key)
    }

    /// Splits a canonical record object into key, metadata and properties.
    ///
    /// Client-supplied `Timestamp` and `ETag` are dropped; the store owns them.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut properties) = value else {
            return Err(DomainError::validation("Table entity must be a JSON object"));
        };

        let partition_key = take_string(&mut properties, PARTITION_KEY)?;
        let row_key = take_string(&mut properties, ROW_KEY)?;
        properties.remove(TIMESTAMP);
        properties.remove(ETAG);

        let key = RecordKey::new(partition_key, row_key);
        key.validate()?;

        Ok(Self::new(key, properties))
    }

    /// Builds the wire object, metadata included
    pub fn into_value(self) -> Value {
        let mut object = Map::with_capacity(self.properties.len() + 4);
        object.insert(PARTITION_KEY.to_string(), Value::String(self.partition_key));
        object.insert(ROW_KEY.to_string(), Value::String(self.row_key));

        if let Some(timestamp) = self.timestamp {
            object.insert(TIMESTAMP.to_string(), Value::String(timestamp.to_rfc3339()));
        }

        if let Some(etag) = self.etag {
            object.insert(ETAG.to_string(), Value::String(etag));
        }

        object.extend(self.properties);
        Value::Object(object)
    }

    pub fn from_record<T: Record>(record: &T) -> Result<Self, DomainError> {
        Self::from_value(encode_record(record)?)
    }

    pub fn into_record<T: Record>(self) -> Result<T, DomainError> {
        decode_record(self.into_value())
    }

    /// Stamps the entity as written now with a fresh etag
    pub fn stamped(mut self) -> Self {
        let now = Utc::now();
        self.timestamp = Some(now);
        self.etag = Some(format!("W/\"datetime'{}'\"", now.to_rfc3339()));
        self
    }
}

fn take_string(properties: &mut Map<String, Value>, field: &str) -> Result<String, DomainError> {
    match properties.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(DomainError::validation(format!("{} must be a string", field))),
        None => Err(DomainError::validation(format!("{} is required", field))),
    }
}

/// Table primitive required by the table handler
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Creates the table if absent; returns true when it was created
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool, DomainError>;

    /// Point lookup
    async fn get_entity(
        &self,
        table: &str,
        key: &RecordKey,
    ) -> Result<Option<TableEntity>, DomainError>;

    /// Strict insert; fails with `Conflict` when the key already exists
    async fn insert_entity(
        &self,
        table: &str,
        entity: TableEntity,
    ) -> Result<TableEntity, DomainError>;

    /// Insert-or-replace keyed on the composite key
    async fn upsert_entity(
        &self,
        table: &str,
        entity: TableEntity,
    ) -> Result<TableEntity, DomainError>;

    /// Point delete; returns false when nothing was there
    async fn delete_entity(&self, table: &str, key: &RecordKey) -> Result<bool, DomainError>;

    /// Full scan ordered by (PartitionKey, RowKey)
    async fn query_entities(&self, table: &str) -> Result<Vec<TableEntity>, DomainError>;
}
