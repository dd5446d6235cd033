//! Typed client side of the gateway

mod adapter;
mod file;
mod gateway_client;
pub mod http_client;

pub use adapter::{GatewayClientAdapter, StorageService};
pub use file::FileContent;
pub use gateway_client::{GatewayClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use http_client::{HttpClient, HttpClientTrait, HttpRequest, HttpResponse, RequestBody};
