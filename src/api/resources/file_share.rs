//! File-share endpoints

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::upload::first_file_part;
use super::MAX_UPLOAD_BYTES;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::FilePath;
use crate::infrastructure::services::StoredFile;

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

pub fn create_file_share_router() -> Router<AppState> {
    Router::new()
        .route("/{share}", post(upload_to_root))
        // second segment is a directory on upload and a file name on download
        .route("/{share}/{name}", get(download_from_root).post(upload_to_directory))
        .route("/{share}/{directory}/{file_name}", get(download_from_directory))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn upload(
    state: &AppState,
    share: String,
    directory: Option<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredFile>), ApiError> {
    let part = first_file_part(multipart).await?;
    let file_name = part
        .file_name
        .ok_or_else(|| ApiError::bad_request("Uploaded part has no file name"))?;

    let stored = state
        .file_share_service
        .upload(FilePath::new(share, directory, file_name), part.content)
        .await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

async fn download(
    state: &AppState,
    share: String,
    directory: Option<String>,
    file_name: String,
) -> Result<Response, ApiError> {
    let file = state
        .file_share_service
        .download(FilePath::new(share, directory, file_name))
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&file.file_name),
            ),
        ],
        file.content,
    )
        .into_response())
}

/// Quoted ASCII `filename` for old clients plus the exact UTF-8 `filename*`
fn content_disposition(file_name: &str) -> String {
    let mut fallback = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        match c {
            '"' | '\\' => {
                fallback.push('\\');
                fallback.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => fallback.push(c),
            _ => fallback.push('_'),
        }
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(file_name, ATTR_CHAR)
    )
}

/// POST /api/fileshare/{share}
pub async fn upload_to_root(
    State(state): State<AppState>,
    Path(share): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredFile>), ApiError> {
    upload(&state, share, None, multipart).await
}

/// POST /api/fileshare/{share}/{directory}
pub async fn upload_to_directory(
    State(state): State<AppState>,
    Path((share, directory)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredFile>), ApiError> {
    upload(&state, share, Some(directory), multipart).await
}

/// GET /api/fileshare/{share}/{file_name}
pub async fn download_from_root(
    State(state): State<AppState>,
    Path((share, file_name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    download(&state, share, None, file_name).await
}

/// GET /api/fileshare/{share}/{directory}/{file_name}
pub async fn download_from_directory(
    State(state): State<AppState>,
    Path((share, directory, file_name)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    download(&state, share, Some(directory), file_name).await
}
