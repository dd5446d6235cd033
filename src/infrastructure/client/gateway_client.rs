//! Typed dispatch client for the storage gateway

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::file::FileContent;
use super::http_client::{HttpClient, HttpClientTrait, HttpRequest, HttpResponse, RequestBody};
use crate::config::ClientConfig;
use crate::domain::storage::QueueMessage;
use crate::domain::{decode_record, decode_records, encode_record, DomainError, Record};
use crate::infrastructure::services::{StoredFile, UploadedBlob};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Generic CRUD facade over the gateway's HTTP surface
///
/// Record types map to `/table/{resource}` through [`Record::resource_name`];
/// responses are decoded with case-insensitive field matching.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Arc<dyn HttpClientTrait>,
    base_url: Url,
}

impl GatewayClient {
    /// Client with the default 30 second request timeout
    pub fn new(base_url: &str) -> Result<Self, DomainError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Client for the `client` configuration section
    pub fn from_config(config: &ClientConfig) -> Result<Self, DomainError> {
        if config.timeout_secs == 0 {
            return Err(DomainError::configuration(
                "client.timeout_secs must be greater than zero",
            ));
        }

        Self::with_timeout(&config.base_url, config.timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        Self::with_http_client(Arc::new(HttpClient::with_timeout(timeout)?), base_url)
    }

    pub fn with_http_client(
        http: Arc<dyn HttpClientTrait>,
        base_url: &str,
    ) -> Result<Self, DomainError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid gateway base URL '{}': {}", base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(DomainError::configuration(format!(
                "Gateway base URL '{}' cannot carry a path",
                base_url
            )));
        }

        info!(base_url = %base_url, "Storage gateway client initialized");
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends percent-encoded path segments to the base URL
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        self.url(segments).to_string()
    }

    fn table_url<T: Record>(&self, key: Option<(&str, &str)>) -> String {
        let resource = T::resource_name();
        match key {
            Some((pk, rk)) => self.endpoint(&["table", &resource, pk, rk]),
            None => self.endpoint(&["table", &resource]),
        }
    }

    fn file_share_url(&self, share: &str, directory: Option<&str>, file: Option<&str>) -> String {
        let mut segments = vec!["fileshare", share];
        segments.extend(directory.filter(|d| !d.trim().is_empty()));
        segments.extend(file);
        self.endpoint(&segments)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DomainError> {
        debug!(method = %request.method, url = %request.url, "Calling storage gateway");
        self.http.execute(request).await
    }

    /// Sends the request and turns any non-2xx status into an error
    async fn send_checked(&self, request: HttpRequest) -> Result<HttpResponse, DomainError> {
        let method = request.method.clone();
        let url = request.url.clone();
        let response = self.send(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        let error = error_from_response(&response);
        warn!(method = %method, url = %url, status = response.status, error = %error, "Storage gateway call failed");
        Err(error)
    }

    /// Like [`send_checked`](Self::send_checked) but a 404 yields `None`
    async fn send_optional(
        &self,
        request: HttpRequest,
    ) -> Result<Option<HttpResponse>, DomainError> {
        let url = request.url.clone();
        let response = self.send(request).await?;

        match response.status {
            404 => {
                debug!(url = %url, "Storage gateway returned not found");
                Ok(None)
            }
            _ if response.is_success() => Ok(Some(response)),
            status => {
                let error = error_from_response(&response);
                warn!(url = %url, status, error = %error, "Storage gateway call failed");
                Err(error)
            }
        }
    }

    pub async fn get_all<T: Record>(&self) -> Result<Vec<T>, DomainError> {
        let response = self
            .send_checked(HttpRequest::get(self.table_url::<T>(None)))
            .await?;

        let records: Vec<T> = decode_records(parse_json(&response)?)?;
        info!(resource = %T::resource_name(), count = records.len(), "Retrieved records");
        Ok(records)
    }

    pub async fn get<T: Record>(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<T>, DomainError> {
        let request = HttpRequest::get(self.table_url::<T>(Some((partition_key, row_key))));

        match self.send_optional(request).await? {
            Some(response) => Ok(Some(decode_record(parse_json(&response)?)?)),
            None => Ok(None),
        }
    }

    /// Strict insert; fails with `Conflict` when the key already exists
    pub async fn add<T: Record>(&self, record: &T) -> Result<T, DomainError> {
        let request = HttpRequest::post(self.table_url::<T>(None))
            .with_body(RequestBody::Json(encode_record(record)?));
        let response = self.send_checked(request).await?;

        info!(resource = %T::resource_name(), key = %record.key(), "Created record");
        decode_record(parse_json(&response)?)
    }

    /// Insert-or-replace
    pub async fn update<T: Record>(&self, record: &T) -> Result<T, DomainError> {
        let request = HttpRequest::put(self.table_url::<T>(None))
            .with_body(RequestBody::Json(encode_record(record)?));
        let response = self.send_checked(request).await?;

        info!(resource = %T::resource_name(), key = %record.key(), "Updated record");
        decode_record(parse_json(&response)?)
    }

    pub async fn delete<T: Record>(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<(), DomainError> {
        self.send_checked(HttpRequest::delete(
            self.table_url::<T>(Some((partition_key, row_key))),
        ))
        .await?;

        info!(resource = %T::resource_name(), partition_key, row_key, "Deleted record");
        Ok(())
    }

    /// Multipart upload under a generated name; returns the public URL
    pub async fn upload_blob(
        &self,
        container: &str,
        file: &FileContent,
    ) -> Result<String, DomainError> {
        let request = HttpRequest::post(self.endpoint(&["blob", container]))
            .with_body(RequestBody::Multipart(file.clone()));
        let response = self.send_checked(request).await?;

        let uploaded: UploadedBlob = parse_typed(&response)?;
        info!(container, blob_name = %uploaded.blob_name, "Uploaded blob");
        Ok(uploaded.url)
    }

    /// Raw upload stored under the file's own name; returns that name
    pub async fn upload_file(
        &self,
        container: &str,
        file: &FileContent,
    ) -> Result<String, DomainError> {
        let mut url = self.url(&["blob", container]);
        url.query_pairs_mut().append_pair("blobName", &file.file_name);

        let request = HttpRequest::post(url.to_string()).with_body(RequestBody::Bytes {
            content: file.content.clone(),
            content_type: file.mime_type(),
        });
        let response = self.send_checked(request).await?;

        let uploaded: UploadedBlob = parse_typed(&response)?;
        info!(container, blob_name = %uploaded.blob_name, "Uploaded file");
        Ok(uploaded.blob_name)
    }

    pub async fn delete_blob(&self, container: &str, blob_name: &str) -> Result<(), DomainError> {
        self.send_checked(HttpRequest::delete(self.endpoint(&["blob", container, blob_name])))
            .await?;
        Ok(())
    }

    pub async fn list_blobs(&self, container: &str) -> Result<Vec<String>, DomainError> {
        let response = self
            .send_checked(HttpRequest::get(self.endpoint(&["blob", container])))
            .await?;
        parse_typed(&response)
    }

    pub async fn send_message(&self, queue: &str, message: &str) -> Result<(), DomainError> {
        let request = HttpRequest::post(self.endpoint(&["queue", queue]))
            .with_body(RequestBody::Text(message.to_string()));
        let response = self.send_checked(request).await?;

        let sent: QueueMessage = parse_typed(&response)?;
        info!(queue, message_id = %sent.message_id, "Sent queue message");
        Ok(())
    }

    /// Dequeues one message; `None` when the queue is empty
    pub async fn receive_message(&self, queue: &str) -> Result<Option<String>, DomainError> {
        let request = HttpRequest::get(self.endpoint(&["queue", queue]));

        match self.send_optional(request).await? {
            Some(response) => {
                let message: QueueMessage = parse_typed(&response)?;
                Ok(Some(message.content))
            }
            None => Ok(None),
        }
    }

    /// Multipart upload into a share; returns the stored file name
    pub async fn upload_to_file_share(
        &self,
        share: &str,
        directory: Option<&str>,
        file: &FileContent,
    ) -> Result<String, DomainError> {
        let request = HttpRequest::post(self.file_share_url(share, directory, None))
            .with_body(RequestBody::Multipart(file.clone()));
        let response = self.send_checked(request).await?;

        let stored: StoredFile = parse_typed(&response)?;
        info!(share, path = %stored.path, "Uploaded file to share");
        Ok(stored.file_name)
    }

    pub async fn download_from_file_share(
        &self,
        share: &str,
        directory: Option<&str>,
        file_name: &str,
    ) -> Result<Bytes, DomainError> {
        let request = HttpRequest::get(self.file_share_url(share, directory, Some(file_name)));
        let response = self.send_checked(request).await?;
        Ok(response.body)
    }
}

fn parse_json(response: &HttpResponse) -> Result<serde_json::Value, DomainError> {
    serde_json::from_slice(&response.body)
        .map_err(|e| DomainError::storage(format!("Invalid JSON from storage gateway: {}", e)))
}

fn parse_typed<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, DomainError> {
    serde_json::from_slice(&response.body)
        .map_err(|e| DomainError::storage(format!("Unexpected response from storage gateway: {}", e)))
}

/// Maps a non-2xx response back onto the domain error it came from
fn error_from_response(response: &HttpResponse) -> DomainError {
    let message = serde_json::from_slice::<ErrorEnvelope>(&response.body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            let text = response.text();
            if text.trim().is_empty() {
                format!("HTTP {}", response.status)
            } else {
                text
            }
        });

    match response.status {
        400 => DomainError::validation(message),
        404 => DomainError::not_found(message),
        409 => DomainError::conflict(message),
        408 | 504 => DomainError::timeout(message),
        status => DomainError::remote(status, message),
    }
}
