use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde_json::{json, Map, Value};

use crate::common::names::fullname;

/// Discriminant of a [`SchemaNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Enum,
    Array,
    Map,
    Union,
    Fixed,
    Record,
}

impl SchemaKind {
    /// Avro type name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Int => "int",
            SchemaKind::Long => "long",
            SchemaKind::Float => "float",
            SchemaKind::Double => "double",
            SchemaKind::Bytes => "bytes",
            SchemaKind::String => "string",
            SchemaKind::Enum => "enum",
            SchemaKind::Array => "array",
            SchemaKind::Map => "map",
            SchemaKind::Union => "union",
            SchemaKind::Fixed => "fixed",
            SchemaKind::Record => "record",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed Avro type.
///
/// Named types (`enum`, `fixed`, `record`) are reference counted so that a
/// schema graph can refer to the same definition from several places,
/// including from inside its own fields.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Enum(Rc<EnumSchema>),
    Array(Box<SchemaNode>),
    Map(Box<SchemaNode>),
    Union(Vec<SchemaNode>),
    Fixed(Rc<FixedSchema>),
    Record(Rc<RecordSchema>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub name: String,
    pub namespace: Option<String>,
    pub doc: Option<String>,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    pub name: String,
    pub namespace: Option<String>,
    pub size: usize,
}

/// A record definition.
///
/// Fields are assigned once, after the record itself is reachable by name,
/// which is what lets a field refer back to its own record.
pub struct RecordSchema {
    pub name: String,
    pub namespace: Option<String>,
    pub doc: Option<String>,
    /// Non-reserved attributes such as `version` or `topic`.
    pub props: Map<String, Value>,
    fields: OnceCell<Vec<Field>>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: SchemaNode,
    pub doc: Option<String>,
    pub default: Option<Value>,
    /// Non-reserved field attributes, kept in declaration order.
    pub props: Map<String, Value>,
}

impl SchemaNode {
    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaNode::Null => SchemaKind::Null,
            SchemaNode::Boolean => SchemaKind::Boolean,
            SchemaNode::Int => SchemaKind::Int,
            SchemaNode::Long => SchemaKind::Long,
            SchemaNode::Float => SchemaKind::Float,
            SchemaNode::Double => SchemaKind::Double,
            SchemaNode::Bytes => SchemaKind::Bytes,
            SchemaNode::String => SchemaKind::String,
            SchemaNode::Enum(_) => SchemaKind::Enum,
            SchemaNode::Array(_) => SchemaKind::Array,
            SchemaNode::Map(_) => SchemaKind::Map,
            SchemaNode::Union(_) => SchemaKind::Union,
            SchemaNode::Fixed(_) => SchemaKind::Fixed,
            SchemaNode::Record(_) => SchemaKind::Record,
        }
    }

    /// Primitive node for an Avro primitive type name.
    pub fn primitive(type_name: &str) -> Option<Self> {
        let node = match type_name {
            "null" => SchemaNode::Null,
            "boolean" => SchemaNode::Boolean,
            "int" => SchemaNode::Int,
            "long" => SchemaNode::Long,
            "float" => SchemaNode::Float,
            "double" => SchemaNode::Double,
            "bytes" => SchemaNode::Bytes,
            "string" => SchemaNode::String,
            _ => return None,
        };
        Some(node)
    }

    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array(Box::new(items))
    }

    pub fn map(values: SchemaNode) -> Self {
        SchemaNode::Map(Box::new(values))
    }

    pub fn enumeration(name: &str, namespace: Option<&str>, symbols: &[&str]) -> Self {
        SchemaNode::Enum(Rc::new(EnumSchema {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            doc: None,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }))
    }

    pub fn fixed(name: &str, namespace: Option<&str>, size: usize) -> Self {
        SchemaNode::Fixed(Rc::new(FixedSchema {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            size,
        }))
    }

    /// Record node with its fields already in place.
    pub fn record(name: &str, namespace: Option<&str>, fields: Vec<Field>) -> Self {
        let record = RecordSchema::new(name, namespace.map(str::to_string), None, Map::new());
        record.define_fields(fields);
        SchemaNode::Record(Rc::new(record))
    }

    /// Short name of a named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            SchemaNode::Enum(e) => Some(&e.name),
            SchemaNode::Fixed(f) => Some(&f.name),
            SchemaNode::Record(r) => Some(&r.name),
            _ => None,
        }
    }

    /// Resolved namespace of a named type.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            SchemaNode::Enum(e) => e.namespace.as_deref(),
            SchemaNode::Fixed(f) => f.namespace.as_deref(),
            SchemaNode::Record(r) => r.namespace.as_deref(),
            _ => None,
        }
    }

    pub fn fullname(&self) -> Option<String> {
        self.name().map(|name| fullname(name, self.namespace()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SchemaNode::Null)
    }

    /// JSON form of this schema.
    ///
    /// Every named type is written out in full the first time it is met and
    /// as its fullname afterwards, so cyclic graphs terminate.
    pub fn to_json(&self) -> Value {
        let mut seen = HashSet::new();
        self.to_json_with(&mut seen)
    }

    /// Compact JSON text of [`SchemaNode::to_json`].
    pub fn canonical_form(&self) -> String {
        self.to_json().to_string()
    }

    fn to_json_with(&self, seen: &mut HashSet<String>) -> Value {
        match self {
            SchemaNode::Null
            | SchemaNode::Boolean
            | SchemaNode::Int
            | SchemaNode::Long
            | SchemaNode::Float
            | SchemaNode::Double
            | SchemaNode::Bytes
            | SchemaNode::String => Value::String(self.kind().as_str().to_string()),
            SchemaNode::Enum(e) => {
                let full = fullname(&e.name, e.namespace.as_deref());
                if !seen.insert(full.clone()) {
                    return Value::String(full);
                }
                let mut obj = named_header("enum", &e.name, e.namespace.as_deref());
                if let Some(doc) = &e.doc {
                    obj.insert("doc".to_string(), json!(doc));
                }
                obj.insert("symbols".to_string(), json!(e.symbols));
                Value::Object(obj)
            }
            SchemaNode::Array(items) => json!({
                "type": "array",
                "items": items.to_json_with(seen),
            }),
            SchemaNode::Map(values) => json!({
                "type": "map",
                "values": values.to_json_with(seen),
            }),
            SchemaNode::Union(branches) => {
                Value::Array(branches.iter().map(|b| b.to_json_with(seen)).collect())
            }
            SchemaNode::Fixed(f) => {
                let full = fullname(&f.name, f.namespace.as_deref());
                if !seen.insert(full.clone()) {
                    return Value::String(full);
                }
                let mut obj = named_header("fixed", &f.name, f.namespace.as_deref());
                obj.insert("size".to_string(), json!(f.size));
                Value::Object(obj)
            }
            SchemaNode::Record(r) => {
                let full = r.fullname();
                if !seen.insert(full.clone()) {
                    return Value::String(full);
                }
                let mut obj = named_header("record", &r.name, r.namespace.as_deref());
                if let Some(doc) = &r.doc {
                    obj.insert("doc".to_string(), json!(doc));
                }
                for (key, value) in &r.props {
                    obj.insert(key.clone(), value.clone());
                }
                let fields: Vec<Value> = r
                    .fields()
                    .iter()
                    .map(|field| {
                        let mut f = Map::new();
                        f.insert("name".to_string(), json!(field.name));
                        f.insert("type".to_string(), field.field_type.to_json_with(seen));
                        if let Some(doc) = &field.doc {
                            f.insert("doc".to_string(), json!(doc));
                        }
                        if let Some(default) = &field.default {
                            f.insert("default".to_string(), default.clone());
                        }
                        for (key, value) in &field.props {
                            f.insert(key.clone(), value.clone());
                        }
                        Value::Object(f)
                    })
                    .collect();
                obj.insert("fields".to_string(), Value::Array(fields));
                Value::Object(obj)
            }
        }
    }
}

fn named_header(kind: &str, name: &str, namespace: Option<&str>) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(kind));
    obj.insert("name".to_string(), json!(name));
    if let Some(ns) = namespace {
        obj.insert("namespace".to_string(), json!(ns));
    }
    obj
}

impl RecordSchema {
    /// A record with no fields assigned yet; see [`RecordSchema::define_fields`].
    pub fn new(
        name: &str,
        namespace: Option<String>,
        doc: Option<String>,
        props: Map<String, Value>,
    ) -> Self {
        Self {
            name: name.to_string(),
            namespace,
            doc,
            props,
            fields: OnceCell::new(),
        }
    }

    /// Assign the fields of this record.
    ///
    /// Returns `false` if the fields were already assigned, in which case the
    /// existing ones are kept.
    pub fn define_fields(&self, fields: Vec<Field>) -> bool {
        self.fields.set(fields).is_ok()
    }

    pub fn fields(&self) -> &[Field] {
        self.fields.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn version(&self) -> Option<&Value> {
        self.props.get("version")
    }

    pub fn fullname(&self) -> String {
        fullname(&self.name, self.namespace.as_deref())
    }
}

// Field types may point back at this record, so only names are printed.
impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field(
                "fields",
                &self.fields().iter().map(|fl| fl.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Field {
    pub fn new(name: &str, field_type: SchemaNode) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            doc: None,
            default: None,
            props: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_of_primitives_is_the_quoted_type_name() {
        assert_eq!(SchemaNode::Long.canonical_form(), r#""long""#);
        assert_eq!(SchemaNode::Bytes.canonical_form(), r#""bytes""#);
    }

    #[test]
    fn canonical_form_of_enum_keeps_symbol_order() {
        let node = SchemaNode::enumeration("Color", Some("com.acme"), &["RED", "GREEN"]);
        assert_eq!(
            node.canonical_form(),
            r#"{"type":"enum","name":"Color","namespace":"com.acme","symbols":["RED","GREEN"]}"#
        );
    }

    #[test]
    fn self_referencing_record_terminates() {
        let record = Rc::new(RecordSchema::new("Node", None, None, Map::new()));
        record.define_fields(vec![
            Field::new("value", SchemaNode::Int),
            Field::new(
                "next",
                SchemaNode::Union(vec![SchemaNode::Null, SchemaNode::Record(Rc::clone(&record))]),
            ),
        ]);
        let node = SchemaNode::Record(record);
        assert_eq!(
            node.to_json(),
            json!({
                "type": "record",
                "name": "Node",
                "fields": [
                    {"name": "value", "type": "int"},
                    {"name": "next", "type": ["null", "Node"]},
                ]
            })
        );
        assert!(format!("{node:?}").contains("Node"));
    }

    #[test]
    fn fields_are_assigned_once() {
        let record = RecordSchema::new("R", None, None, Map::new());
        assert!(record.define_fields(vec![Field::new("a", SchemaNode::Int)]));
        assert!(!record.define_fields(Vec::new()));
        assert_eq!(record.fields().len(), 1);
    }
}
