use std::time::Duration;

use axum::http::{HeaderName, Uri};
use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, timeout_middleware, REQUEST_ID_HEADER};
use super::resources;
use super::state::AppState;
use super::types::ApiError;
use crate::domain::ResourceClass;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", resources::create_api_router())
        .fallback(no_route)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            request_timeout,
            timeout_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// JSON 404 naming the resource class when the path has an unknown one
async fn no_route(uri: Uri) -> ApiError {
    let path = uri.path();

    if let Some(rest) = path.strip_prefix("/api/") {
        let segment = rest.split('/').next().unwrap_or_default();
        if let Err(e) = segment.parse::<ResourceClass>() {
            return e.into();
        }
    }

    ApiError::not_found(format!("No route for '{}'", path))
}
