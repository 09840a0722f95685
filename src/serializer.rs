use std::collections::HashSet;

use serde_json::Value;

use crate::avro::SchemaNode;
use crate::common::names::fullname;

/// Serialize a top-level schema to `.avsc` text with a fresh dedup set.
pub fn serialize_schema(node: &SchemaNode, namespace: &str) -> String {
    let mut written = HashSet::new();
    serialize(node, &mut written, namespace)
}

/// Serialize `node` to schema text.
///
/// Records are written in full the first time their name is met and as a
/// quoted reference afterwards; `written` collects those names and must be
/// shared by every call that contributes to the same output document.
///
/// A union containing `null` is followed by `,"default":null`, which only
/// makes sense inside a field object.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip(node, written), fields(kind = %node.kind())))]
pub fn serialize(
    node: &SchemaNode,
    written: &mut HashSet<String>,
    enclosing_namespace: &str,
) -> String {
    let mut buf = String::new();
    write_type(&mut buf, node, written, enclosing_namespace);
    buf
}

fn write_type(
    buf: &mut String,
    node: &SchemaNode,
    written: &mut HashSet<String>,
    enclosing_namespace: &str,
) {
    match node {
        SchemaNode::Union(branches) => {
            buf.push('[');
            let mut nullable = false;
            for (i, branch) in branches.iter().enumerate() {
                if i > 0 {
                    buf.push(',');
                }
                nullable |= branch.is_null();
                write_type(buf, branch, written, "");
            }
            buf.push(']');
            if nullable {
                buf.push_str(r#","default":null"#);
            }
        }
        SchemaNode::Record(record) if !written.contains(&record.name) => {
            written.insert(record.name.clone());
            let namespace = record.namespace.as_deref().unwrap_or(enclosing_namespace);

            buf.push_str(r#"{"type":"record","name":"#);
            buf.push_str(&quoted(&record.name));
            for prop in ["version", "topic"] {
                if let Some(value) = record.props.get(prop) {
                    push_property(buf, prop, value);
                }
            }
            if !namespace.is_empty() {
                push_property(buf, "namespace", &Value::from(namespace));
            }

            buf.push_str(r#","fields":["#);
            for (i, field) in record.fields().iter().enumerate() {
                if i > 0 {
                    buf.push(',');
                }
                buf.push_str(r#"{"name":"#);
                buf.push_str(&quoted(&field.name));
                buf.push_str(r#","type":"#);
                write_type(buf, &field.field_type, written, namespace);
                for (key, value) in &field.props {
                    push_property(buf, key, value);
                }
                buf.push('}');
            }
            buf.push_str("]}");
        }
        SchemaNode::Record(record) => {
            buf.push_str(&quoted(&fullname(&record.name, record.namespace.as_deref())));
        }
        SchemaNode::Array(items) => {
            buf.push_str(r#"{"type":"array","items":"#);
            write_type(buf, items, written, enclosing_namespace);
            buf.push('}');
        }
        SchemaNode::Null
        | SchemaNode::Boolean
        | SchemaNode::Int
        | SchemaNode::Long
        | SchemaNode::Float
        | SchemaNode::Double
        | SchemaNode::Bytes
        | SchemaNode::String
        | SchemaNode::Enum(_)
        | SchemaNode::Fixed(_)
        | SchemaNode::Map(_) => buf.push_str(&node.canonical_form()),
    }
}

fn push_property(buf: &mut String, key: &str, value: &Value) {
    buf.push(',');
    buf.push_str(&quoted(key));
    buf.push(':');
    buf.push_str(&value.to_string());
}

fn quoted(s: &str) -> String {
    Value::from(s).to_string()
}
