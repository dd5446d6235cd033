//! Shared upload body handling

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;

use crate::api::types::ApiError;

/// One uploaded file taken from a request body
#[derive(Debug, Clone, Default)]
pub struct UploadedPart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Bytes,
}

pub fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// First part carrying a file name, else the first part at all
pub async fn first_file_part(mut multipart: Multipart) -> Result<UploadedPart, ApiError> {
    let mut fallback = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e.body_text())))?
    {
        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty());
        let content_type = field.content_type().map(str::to_string);
        let content = field.bytes().await.map_err(|e| {
            ApiError::bad_request(format!("Failed to read multipart field: {}", e.body_text()))
        })?;

        let part = UploadedPart {
            file_name,
            content_type,
            content,
        };

        if part.file_name.is_some() {
            return Ok(part);
        }

        if fallback.is_none() {
            fallback = Some(part);
        }
    }

    fallback.ok_or_else(|| ApiError::bad_request("Multipart body contains no file part"))
}

/// Reads either a multipart file part or the raw body
pub async fn read_upload(request: Request) -> Result<UploadedPart, ApiError> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        return first_file_part(multipart).await;
    }

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let content = Bytes::from_request(request, &())
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?;

    Ok(UploadedPart {
        file_name: None,
        content_type,
        content,
    })
}
