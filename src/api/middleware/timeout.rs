//! Per-request time ceiling

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::types::ApiError;

/// Answers 504 with the JSON error body when the inner service exceeds `limit`
pub async fn timeout_middleware(
    State(limit): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(method = %method, path = %path, limit_ms = limit.as_millis() as u64, "Request timed out");
            ApiError::timeout(format!(
                "Request exceeded {} ms",
                limit.as_millis()
            ))
            .into_response()
        }
    }
}
