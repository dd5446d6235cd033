//! API wire types

pub mod error;

pub use error::{ApiError, ApiErrorResponse};
