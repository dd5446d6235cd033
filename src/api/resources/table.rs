//! Table-entity endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::RecordKey;

pub fn create_table_router() -> Router<AppState> {
    Router::new()
        .route("/{resource}", get(list_entities).post(add_entity).put(update_entity))
        .route(
            "/{resource}/{partition_key}/{row_key}",
            get(get_entity).delete(delete_entity),
        )
}

/// GET /api/table/{resource}
pub async fn list_entities(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    debug!(resource = %resource, "Listing table entities");
    let entities = state.table_service.list(&resource).await?;
    Ok(Json(entities))
}

/// GET /api/table/{resource}/{partition_key}/{row_key}
pub async fn get_entity(
    State(state): State<AppState>,
    Path((resource, partition_key, row_key)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let key = RecordKey::new(partition_key, row_key);
    let entity = state.table_service.get(&resource, &key).await?;
    Ok(Json(entity))
}

/// POST /api/table/{resource}
pub async fn add_entity(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let entity = state.table_service.add(&resource, &body).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// PUT /api/table/{resource}
pub async fn update_entity(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let entity = state.table_service.update(&resource, &body).await?;
    Ok(Json(entity))
}

/// DELETE /api/table/{resource}/{partition_key}/{row_key}
pub async fn delete_entity(
    State(state): State<AppState>,
    Path((resource, partition_key, row_key)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let key = RecordKey::new(partition_key, row_key);
    state.table_service.delete(&resource, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
