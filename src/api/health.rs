//! Health endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Gateway status; readiness adds the store probe and the table resources served
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_store: Option<StoreProbe>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StoreProbe {
    pub status: HealthStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn running() -> Self {
        Self {
            status: HealthStatus::Healthy,
            version: env!("CARGO_PKG_VERSION"),
            table_store: None,
            resources: Vec::new(),
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::running())
}

/// 503 until the table store answers a scan of a registered resource
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let outcome = state.table_service.probe().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let probe = match outcome {
        Ok(()) => StoreProbe {
            status: HealthStatus::Healthy,
            latency_ms,
            error: None,
        },
        Err(e) => {
            warn!(error = %e, latency_ms, "Table store probe failed");
            StoreProbe {
                status: HealthStatus::Unhealthy,
                latency_ms,
                error: Some(e.to_string()),
            }
        }
    };

    let code = match probe.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status: probe.status,
        table_store: Some(probe),
        resources: state.table_service.resources(),
        ..HealthResponse::running()
    };

    (code, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::response::Response;
    use serde_json::Value;

    use crate::domain::storage::{MockTableStore, TableStore};
    use crate::domain::DomainError;
    use crate::infrastructure::services::{RecordRegistry, TableService};
    use crate::infrastructure::storage::{EnsuredResources, StorageFactory};

    fn state_with_table_store(store: Arc<dyn TableStore>) -> AppState {
        let mut state = AppState::new(
            StorageFactory::in_memory("http://localhost:8080/api/blob"),
            RecordRegistry::with_defaults(),
            "jpg",
        );
        state.table_service = Arc::new(TableService::new(
            store,
            Arc::new(RecordRegistry::with_defaults()),
            EnsuredResources::new(),
        ));
        state
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_running_response_omits_probe() {
        let json = serde_json::to_value(HealthResponse::running()).unwrap();

        assert_eq!(json["status"], "healthy");
        assert!(json.get("table_store").is_none());
        assert!(json.get("resources").is_none());
    }

    #[tokio::test]
    async fn test_ready_lists_table_resources() {
        let state = AppState::new(
            StorageFactory::in_memory("http://localhost:8080/api/blob"),
            RecordRegistry::with_defaults(),
            "jpg",
        );

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["table_store"]["status"], "healthy");
        assert_eq!(
            json["resources"],
            serde_json::json!(["Customers", "Orders", "Products"])
        );
    }

    #[tokio::test]
    async fn test_ready_unavailable_when_store_fails() {
        let mut store = MockTableStore::new();
        store
            .expect_create_table_if_not_exists()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let response = ready_check(State(state_with_table_store(Arc::new(store))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = json_body(response).await;
        assert_eq!(json["status"], "unhealthy");
        assert!(json["table_store"]["error"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }
}
