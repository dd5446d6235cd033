//! Infrastructure layer - storage adapters, resource handlers and the typed client

pub mod client;
pub mod logging;
pub mod services;
pub mod storage;
