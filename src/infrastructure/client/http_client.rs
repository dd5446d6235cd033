use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::file::FileContent;
use crate::domain::DomainError;

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Text(String),
    Bytes { content: Bytes, content_type: String },
    /// Single-part `multipart/form-data` upload under the `file` field
    Multipart(FileContent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// Sends the request; any HTTP status is a successful exchange
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_reqwest_error(url: &str, e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::timeout(format!("Request to {} timed out", url))
    } else {
        DomainError::transport(format!("Request to {} failed: {}", url, e))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, DomainError> {
        let HttpRequest { method, url, body } = request;
        let mut builder = self.client.request(method, &url);

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Text(text) => builder
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(text),
            RequestBody::Bytes {
                content,
                content_type,
            } => builder.header(CONTENT_TYPE, content_type).body(content),
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.content.to_vec())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime_type())
                    .map_err(|e| {
                        DomainError::validation(format!(
                            "Invalid content type for '{}': {}",
                            file.file_name, e
                        ))
                    })?;
                builder.multipart(Form::new().part("file", part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(&url, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(&url, e))?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
