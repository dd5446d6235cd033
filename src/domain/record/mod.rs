//! Record domain - typed table records, resource identity and the wire codec

mod codec;
mod entity;
mod models;
mod resource;

pub use codec::{decode_record, decode_record_bytes, decode_records, encode_record};
pub use entity::{Record, RecordKey};
pub use models::{Customer, Order, Product};
pub use resource::{resource_name, ResourceClass};
