//! # avro-samples
//!
//! Generate representative sample messages from
//! [Apache Avro](https://avro.apache.org/) protocols and schemas.
//!
//! ## Features
//!
//! - One fixed, schema-conformant JSON value per Avro type
//! - Sample messages for every protocol type tagged with a `topic`
//! - Canonical `.avsc` export per record, with repeated records collapsed
//!   into name references
//! - Checks each exported sample against its schema with `apache-avro`
//! - CLI tool `avpr2sample` for files and directory trees
//!
//! ## Example (Programmatic Usage)
//!
//! ```
//! use avro_samples::parser::parse_schema;
//! use avro_samples::sample::generate_sample;
//! use avro_samples::serializer::serialize_schema;
//!
//! let node = parse_schema(r#"{
//!     "type": "record",
//!     "name": "Greeting",
//!     "namespace": "demo",
//!     "fields": [
//!         {"name": "text", "type": "string"},
//!         {"name": "lang", "type": ["null", {"type": "enum", "name": "Lang", "symbols": ["EN", "FR"]}]}
//!     ]
//! }"#).unwrap();
//!
//! let sample = generate_sample(&node).unwrap();
//! assert_eq!(sample.to_string(), r#"{"text":"string","lang":"EN"}"#);
//!
//! let avsc = serialize_schema(&node, "");
//! assert!(avsc.starts_with(r#"{"type":"record","name":"Greeting","namespace":"demo""#));
//! ```
//!
//! ## Example (CLI)
//!
//! ```bash
//! avpr2sample contracts/orders.avpr
//! ```
//!
//! Or to export one `.avsc` and one sample per record:
//!
//! ```bash
//! avpr2sample contracts/ --schemas --out-dir out
//! ```
//!
//! ## Crate Layout
//!
//! - [`avro`] - Schema node model (`SchemaNode`, `RecordSchema`, `Field`)
//! - [`parser`] - `.avsc` / `.avpr` text to schema nodes, topic map
//! - [`sample`] - Schema → sample value generator
//! - [`serializer`] - Schema → canonical schema text
//! - [`validate`] - Sample check through `apache-avro`
//! - [`driver`] - File and directory processing
//! - [`common`] - Name helpers
//! - [`error`] - Error types
//!
//! The CLI binary is enabled with the `cli` feature.
pub mod avro;
pub mod common;
pub mod driver;
pub mod error;
pub mod parser;
pub mod sample;
pub mod serializer;
pub mod validate;
