//! Registry of record kinds served by the table handler

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::storage::TableEntity;
use crate::domain::{
    decode_record_bytes, encode_record, Customer, DomainError, Order, Product, Record,
};

type DecodeFn = fn(&[u8]) -> Result<TableEntity, DomainError>;
type ProjectFn = fn(TableEntity) -> Result<Value, DomainError>;

/// Typed decoder and projector for one record kind
#[derive(Debug, Clone, Copy)]
pub struct RecordCodec {
    type_name: &'static str,
    decode: DecodeFn,
    project: ProjectFn,
}

impl RecordCodec {
    pub fn of<T: Record>() -> Self {
        Self {
            type_name: T::TYPE_NAME,
            decode: decode_entity::<T>,
            project: project_entity::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Validates a request body against the record type and turns it into a table row
    pub fn decode(&self, body: &[u8]) -> Result<TableEntity, DomainError> {
        (self.decode)(body)
    }

    /// Renders a stored row as the record type's canonical JSON
    pub fn project(&self, entity: TableEntity) -> Result<Value, DomainError> {
        (self.project)(entity)
    }
}

fn decode_entity<T: Record>(body: &[u8]) -> Result<TableEntity, DomainError> {
    let record: T = decode_record_bytes(body)?;
    TableEntity::from_record(&record)
}

fn project_entity<T: Record>(entity: TableEntity) -> Result<Value, DomainError> {
    let key = entity.key();
    let record: T = entity.into_record().map_err(|e| {
        DomainError::storage(format!(
            "Stored entity '{}' is not a valid {}: {}",
            key,
            T::TYPE_NAME,
            e
        ))
    })?;

    encode_record(&record)
}

/// Maps logical table names to the record kind stored in them
#[derive(Debug, Clone, Default)]
pub struct RecordRegistry {
    codecs: HashMap<String, RecordCodec>,
}

impl RecordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the retail record kinds
    pub fn with_defaults() -> Self {
        Self::new()
            .register::<Customer>()
            .register::<Product>()
            .register::<Order>()
    }

    /// Serves `T` under its resource name
    pub fn register<T: Record>(mut self) -> Self {
        self.codecs
            .insert(T::resource_name().into_owned(), RecordCodec::of::<T>());
        self
    }

    pub fn resolve(&self, resource: &str) -> Result<&RecordCodec, DomainError> {
        self.codecs
            .get(resource)
            .ok_or_else(|| DomainError::not_found(format!("Unknown table resource '{}'", resource)))
    }

    pub fn resources(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
