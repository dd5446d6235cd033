//! Resource endpoints, one router per resource class

pub mod blob;
pub mod file_share;
pub mod queue;
pub mod table;
mod upload;

use axum::Router;

use crate::api::state::AppState;
use crate::domain::ResourceClass;

/// Upper bound on blob and file-share request bodies
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Router for one resource class
pub fn create_resource_router(class: ResourceClass) -> Router<AppState> {
    match class {
        ResourceClass::Table => table::create_table_router(),
        ResourceClass::Blob => blob::create_blob_router(),
        ResourceClass::Queue => queue::create_queue_router(),
        ResourceClass::FileShare => file_share::create_file_share_router(),
    }
}

/// Every resource class nested under its path segment
pub fn create_api_router() -> Router<AppState> {
    ResourceClass::ALL
        .iter()
        .fold(Router::new(), |router, class| {
            router.nest(&format!("/{}", class.as_str()), create_resource_router(*class))
        })
}
