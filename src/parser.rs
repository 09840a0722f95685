//! JSON text to [`SchemaNode`](crate::avro::SchemaNode) graphs.
pub mod protocol;
pub mod schema;

pub use protocol::{name_to_topic_map, parse_protocol, Protocol};
pub use schema::{parse_schema, SchemaParser};
