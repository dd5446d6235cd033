//! PostgreSQL table store with connection pooling

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::storage::{TableEntity, TableStore};
use crate::domain::{DomainError, RecordKey};

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/storage_gateway".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

/// Table store backed by PostgreSQL
///
/// Every logical table shares one physical `table_entities` table keyed on
/// (table_name, partition_key, row_key); properties are kept as JSONB.
/// Logical tables are registered in `gateway_tables`.
pub struct PostgresTableStore {
    pool: PgPool,
}

impl Debug for PostgresTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresTableStore").finish()
    }
}

impl PostgresTableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with a pooled connection and creates the schema if needed
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gateway_tables (
                name VARCHAR(255) PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create table registry: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS table_entities (
                table_name VARCHAR(255) NOT NULL,
                partition_key VARCHAR(1024) NOT NULL,
                row_key VARCHAR(1024) NOT NULL,
                properties JSONB NOT NULL,
                etag VARCHAR(255) NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (table_name, partition_key, row_key)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create entity table: {}", e)))?;

        Ok(())
    }

    fn entity_from_row(row: &PgRow) -> Result<TableEntity, DomainError> {
        let properties = match row.get::<Value, _>("properties") {
            Value::Object(map) => map,
            other => {
                return Err(DomainError::storage(format!(
                    "Stored properties are not an object: {}",
                    other
                )))
            }
        };

        Ok(TableEntity {
            partition_key: row.get("partition_key"),
            row_key: row.get("row_key"),
            timestamp: Some(row.get::<DateTime<Utc>, _>("updated_at")),
            etag: Some(row.get("etag")),
            properties,
        })
    }
}

#[async_trait]
impl TableStore for PostgresTableStore {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "INSERT INTO gateway_tables (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(table)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create table '{}': {}", table, e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_entity(
        &self,
        table: &str,
        key: &RecordKey,
    ) -> Result<Option<TableEntity>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT partition_key, row_key, properties, etag, updated_at
            FROM table_entities
            WHERE table_name = $1 AND partition_key = $2 AND row_key = $3
            "#,
        )
        .bind(table)
        .bind(&key.partition_key)
        .bind(&key.row_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get entity: {}", e)))?;

        row.as_ref().map(Self::entity_from_row).transpose()
    }

    async fn insert_entity(
        &self,
        table: &str,
        entity: TableEntity,
    ) -> Result<TableEntity, DomainError> {
        let entity = entity.stamped();
        let key = entity.key();

        sqlx::query(
            r#"
            INSERT INTO table_entities (table_name, partition_key, row_key, properties, etag, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(table)
        .bind(&entity.partition_key)
        .bind(&entity.row_key)
        .bind(Value::Object(entity.properties.clone()))
        .bind(&entity.etag)
        .bind(entity.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::conflict(
                format!("Entity '{}' already exists in table '{}'", key, table),
            ),
            _ => DomainError::storage(format!("Failed to insert entity: {}", e)),
        })?;

        Ok(entity)
    }

    async fn upsert_entity(
        &self,
        table: &str,
        entity: TableEntity,
    ) -> Result<TableEntity, DomainError> {
        let entity = entity.stamped();

        sqlx::query(
            r#"
            INSERT INTO table_entities (table_name, partition_key, row_key, properties, etag, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (table_name, partition_key, row_key)
            DO UPDATE SET properties = EXCLUDED.properties,
                          etag = EXCLUDED.etag,
                          updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(table)
        .bind(&entity.partition_key)
        .bind(&entity.row_key)
        .bind(Value::Object(entity.properties.clone()))
        .bind(&entity.etag)
        .bind(entity.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to upsert entity: {}", e)))?;

        Ok(entity)
    }

    async fn delete_entity(&self, table: &str, key: &RecordKey) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "DELETE FROM table_entities WHERE table_name = $1 AND partition_key = $2 AND row_key = $3",
        )
        .bind(table)
        .bind(&key.partition_key)
        .bind(&key.row_key)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to delete entity: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn query_entities(&self, table: &str) -> Result<Vec<TableEntity>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT partition_key, row_key, properties, etag, updated_at
            FROM table_entities
            WHERE table_name = $1
            ORDER BY partition_key, row_key
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query entities: {}", e)))?;

        rows.iter().map(Self::entity_from_row).collect()
    }
}
