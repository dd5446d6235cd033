//! API middleware components

pub mod logging;
pub mod timeout;

pub use logging::{logging_middleware, REQUEST_ID_HEADER};
pub use timeout::timeout_middleware;
