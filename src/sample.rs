use serde_json::{json, Map, Value};

use crate::avro::SchemaNode;
use crate::error::GenerationError;

/// Sample value of `bytes`: the single character U+00FF.
pub const BYTES_SAMPLE: &str = "\u{00FF}";
/// Sample value of `string`.
pub const STRING_SAMPLE: &str = "string";
/// Record nesting depth at which generation gives up.
pub const DEFAULT_MAX_DEPTH: usize = 40;

/// Generate a sample message for a top-level schema.
pub fn generate_sample(node: &SchemaNode) -> Result<Value, GenerationError> {
    generate_sample_within(node, "")
}

/// Generate a sample for `node` as if it appeared directly inside the record
/// named `enclosing_record_name`.
pub fn generate_sample_within(
    node: &SchemaNode,
    enclosing_record_name: &str,
) -> Result<Value, GenerationError> {
    SampleGenerator::new().generate(node, enclosing_record_name)
}

/// Produces one fixed, schema-conformant value per Avro type.
///
/// A record whose name equals the immediately enclosing record name fails
/// with [`GenerationError::RecursiveSchema`]. Only that one level is checked:
/// arrays and unions pass the enclosing name through unchanged, so
/// `R { xs: array<R> }` is caught, but `A { b: B }, B { a: A }` is not and
/// runs until `max_depth` is exceeded.
///
/// `max_depth` counts nested records only; array and union wrappers around
/// a record do not add to it.
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    pub max_depth: usize,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleGenerator {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    #[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip(self, node), fields(kind = %node.kind())))]
    pub fn generate(
        &self,
        node: &SchemaNode,
        enclosing_record_name: &str,
    ) -> Result<Value, GenerationError> {
        self.sample(node, enclosing_record_name, 0)
    }

    fn sample(
        &self,
        node: &SchemaNode,
        enclosing: &str,
        depth: usize,
    ) -> Result<Value, GenerationError> {
        if depth > self.max_depth {
            return Err(GenerationError::DepthExceeded(self.max_depth));
        }
        if let SchemaNode::Record(record) = node {
            if record.name == enclosing {
                return Err(GenerationError::RecursiveSchema(record.name.clone()));
            }
        }

        match node {
            SchemaNode::Null => Ok(Value::Null),
            SchemaNode::Boolean => Ok(Value::Bool(false)),
            SchemaNode::Int | SchemaNode::Long => Ok(json!(0)),
            SchemaNode::Float | SchemaNode::Double => Ok(json!(0.0)),
            SchemaNode::Bytes => Ok(Value::String(BYTES_SAMPLE.to_string())),
            SchemaNode::String => Ok(Value::String(STRING_SAMPLE.to_string())),
            SchemaNode::Enum(e) => e
                .symbols
                .first()
                .map(|symbol| Value::String(symbol.clone()))
                .ok_or_else(|| GenerationError::EmptyEnum(e.name.clone())),
            SchemaNode::Array(items) => {
                Ok(Value::Array(vec![self.sample(items, enclosing, depth)?]))
            }
            SchemaNode::Map(_) => Err(GenerationError::UnsupportedMap),
            // Last branch wins: nullable fields are written `["null", T]`.
            SchemaNode::Union(branches) => match branches.last() {
                Some(last) => self.sample(last, enclosing, depth),
                None => Err(GenerationError::EmptyUnion),
            },
            SchemaNode::Fixed(f) => Ok(Value::String("n".repeat(f.size))),
            SchemaNode::Record(record) => {
                let mut msg = Map::new();
                for field in record.fields() {
                    let value = self.sample(&field.field_type, &record.name, depth + 1)?;
                    msg.insert(field.name.clone(), value);
                }
                Ok(Value::Object(msg))
            }
        }
    }
}
