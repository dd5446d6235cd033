//! Blob endpoints

use axum::extract::{DefaultBodyLimit, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::upload::read_upload;
use super::MAX_UPLOAD_BYTES;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::services::{BlobUpload, UploadedBlob};

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(rename = "blobName")]
    pub blob_name: Option<String>,
}

pub fn create_blob_router() -> Router<AppState> {
    Router::new()
        .route("/{container}", get(list_blobs).post(upload_blob))
        .route(
            "/{container}/{blob_name}",
            get(download_blob).delete(delete_blob),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /api/blob/{container}
///
/// Accepts a multipart upload (first file part) or a raw body.
pub async fn upload_blob(
    State(state): State<AppState>,
    Path(container): Path<String>,
    Query(query): Query<UploadQuery>,
    request: Request,
) -> Result<Json<UploadedBlob>, ApiError> {
    let part = read_upload(request).await?;

    let upload = BlobUpload {
        content: part.content,
        file_name: part.file_name,
        content_type: part.content_type,
        blob_name: query.blob_name,
    };

    let uploaded = state.blob_service.upload(&container, upload).await?;
    Ok(Json(uploaded))
}

/// GET /api/blob/{container}
pub async fn list_blobs(
    State(state): State<AppState>,
    Path(container): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.blob_service.list(&container).await?))
}

/// GET /api/blob/{container}/{blob_name}
pub async fn download_blob(
    State(state): State<AppState>,
    Path((container, blob_name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let blob = state.blob_service.download(&container, &blob_name).await?;

    Ok((
        [(header::CONTENT_TYPE, blob.content_type)],
        blob.content,
    )
        .into_response())
}

/// DELETE /api/blob/{container}/{blob_name}
pub async fn delete_blob(
    State(state): State<AppState>,
    Path((container, blob_name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.blob_service.delete(&container, &blob_name).await?;
    Ok(StatusCode::NO_CONTENT)
}
