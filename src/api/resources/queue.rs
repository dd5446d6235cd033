//! Queue endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::QueueMessage;

pub fn create_queue_router() -> Router<AppState> {
    Router::new().route("/{queue}", get(receive_message).post(send_message))
}

/// POST /api/queue/{queue} with the message text as body
pub async fn send_message(
    State(state): State<AppState>,
    Path(queue): Path<String>,
    body: String,
) -> Result<(StatusCode, Json<QueueMessage>), ApiError> {
    let message = state.queue_service.send(&queue, body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/queue/{queue} dequeues one message
pub async fn receive_message(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> Result<Json<QueueMessage>, ApiError> {
    state
        .queue_service
        .receive(&queue)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Queue '{}' has no messages", queue)))
}
