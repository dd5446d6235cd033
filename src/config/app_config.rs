use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Ceiling on a single request, answered with 504 when exceeded
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Storage backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Table backend: `memory` or `postgres`
    pub backend: String,
    pub postgres: PostgresSettings,
    /// Base of public blob URLs; defaults to the gateway's own blob route
    pub public_base_url: Option<String>,
    /// Extension for generated blob names when the upload has none
    pub default_blob_extension: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Settings for callers using the typed client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            postgres: PostgresSettings::default(),
            public_base_url: None,
            default_blob_extension: "jpg".to_string(),
        }
    }
}

impl Default for PostgresSettings {
    fn default() -> Self {
        let defaults = PostgresConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
            min_connections: defaults.min_connections,
            connect_timeout_secs: defaults.connect_timeout_secs,
            idle_timeout_secs: defaults.idle_timeout_secs,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StorageSettings {
    /// Resolves the table backend; unknown names are a configuration error
    pub fn storage_config(&self) -> Result<StorageConfig, crate::domain::DomainError> {
        match StorageType::from_str(&self.backend) {
            Some(StorageType::InMemory) => Ok(StorageConfig::InMemory),
            Some(StorageType::Postgres) => Ok(StorageConfig::Postgres(
                PostgresConfig::new(&self.postgres.url)
                    .with_max_connections(self.postgres.max_connections)
                    .with_min_connections(self.postgres.min_connections)
                    .with_connect_timeout(self.postgres.connect_timeout_secs)
                    .with_idle_timeout(self.postgres.idle_timeout_secs),
            )),
            None => Err(crate::domain::DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                self.backend
            ))),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Public blob URL base, falling back to this server's download route
    pub fn public_blob_base_url(&self) -> String {
        match &self.storage.public_base_url {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => {
                let host = match self.server.host.as_str() {
                    "0.0.0.0" | "::" => "localhost",
                    host => host,
                };
                format!("http://{}:{}/api/blob", host, self.server.port)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.storage.default_blob_extension, "jpg");
        assert!(matches!(
            config.storage.storage_config().unwrap(),
            StorageConfig::InMemory
        ));
    }

    #[test]
    fn test_public_blob_base_url() {
        let mut config = AppConfig::default();
        assert_eq!(config.public_blob_base_url(), "http://localhost:8080/api/blob");

        config.storage.public_base_url = Some("https://cdn.example.com/blobs/".to_string());
        assert_eq!(config.public_blob_base_url(), "https://cdn.example.com/blobs");
    }

    #[test]
    fn test_unknown_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = "cosmos".to_string();
        assert!(config.storage.storage_config().is_err());

        config.storage.backend = "postgres".to_string();
        config.storage.postgres.max_connections = 3;
        match config.storage.storage_config().unwrap() {
            StorageConfig::Postgres(pg) => assert_eq!(pg.max_connections, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": {"port": 9090},
            "logging": {"format": "json"}
        }))
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(matches!(config.logging.format, LogFormat::Json));
    }

    #[test]
    fn test_client_section() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "client": {"base_url": "https://storage.example.com/api", "timeout_secs": 5}
        }))
        .unwrap();

        assert_eq!(config.client.base_url, "https://storage.example.com/api");
        assert_eq!(config.client.timeout(), Duration::from_secs(5));
        assert_eq!(AppConfig::default().client.timeout(), DEFAULT_TIMEOUT);
    }
}
