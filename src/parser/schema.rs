use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::avro::{EnumSchema, Field, FixedSchema, RecordSchema, SchemaNode};
use crate::common::names::{fullname, is_valid_name, is_valid_namespace, split_fullname};
use crate::error::ParseError;

const RECORD_ATTRIBUTES: &[&str] = &["type", "name", "namespace", "doc", "fields", "aliases"];
const FIELD_ATTRIBUTES: &[&str] = &["name", "type", "doc", "default", "order", "aliases"];

/// Parse a standalone `.avsc` schema.
pub fn parse_schema(text: &str) -> Result<SchemaNode, ParseError> {
    SchemaParser::new().parse_str(text)
}

/// Builds [`SchemaNode`] graphs from Avro JSON, keeping a table of the named
/// types seen so far so that later definitions can refer to them.
#[derive(Debug, Default)]
pub struct SchemaParser {
    names: HashMap<String, SchemaNode>,
}

impl SchemaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_str(&mut self, text: &str) -> Result<SchemaNode, ParseError> {
        let json: Value = serde_json::from_str(text)?;
        self.parse_value(&json, None)
    }

    /// Parse one schema in the context of `namespace`.
    pub fn parse_value(
        &mut self,
        json: &Value,
        namespace: Option<&str>,
    ) -> Result<SchemaNode, ParseError> {
        match json {
            Value::String(name) => self.resolve_type_name(name, namespace),
            Value::Array(branches) => {
                let mut nodes = Vec::with_capacity(branches.len());
                for branch in branches {
                    nodes.push(self.parse_value(branch, namespace)?);
                }
                Ok(SchemaNode::Union(nodes))
            }
            Value::Object(obj) => self.parse_object(obj, namespace),
            other => Err(ParseError::InvalidSchema(other.to_string())),
        }
    }

    /// Look up a named type by short name or fullname.
    pub fn lookup(&self, name: &str, namespace: Option<&str>) -> Option<SchemaNode> {
        if name.contains('.') {
            return self.names.get(name).cloned();
        }
        if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
            if let Some(node) = self.names.get(&format!("{ns}.{name}")) {
                return Some(node.clone());
            }
        }
        self.names.get(name).cloned()
    }

    fn resolve_type_name(
        &self,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<SchemaNode, ParseError> {
        SchemaNode::primitive(name)
            .or_else(|| self.lookup(name, namespace))
            .ok_or_else(|| ParseError::UnknownType(name.to_string()))
    }

    fn parse_object(
        &mut self,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaNode, ParseError> {
        let type_name = match obj.get("type") {
            Some(Value::String(type_name)) => type_name.as_str(),
            // {"type": {...}} and {"type": [...]} wrap another schema
            Some(nested) => return self.parse_value(nested, namespace),
            None => {
                return Err(ParseError::MissingAttribute {
                    kind: "schema",
                    attribute: "type",
                })
            }
        };

        match type_name {
            "record" | "error" => self.parse_record(obj, namespace),
            "enum" => self.parse_enum(obj, namespace),
            "fixed" => self.parse_fixed(obj, namespace),
            "array" => {
                let items = obj.get("items").ok_or(ParseError::MissingAttribute {
                    kind: "array",
                    attribute: "items",
                })?;
                Ok(SchemaNode::array(self.parse_value(items, namespace)?))
            }
            "map" => {
                let values = obj.get("values").ok_or(ParseError::MissingAttribute {
                    kind: "map",
                    attribute: "values",
                })?;
                Ok(SchemaNode::map(self.parse_value(values, namespace)?))
            }
            // primitives with annotations such as `logicalType`, or references
            other => self.resolve_type_name(other, namespace),
        }
    }

    fn named(
        &self,
        obj: &Map<String, Value>,
        kind: &'static str,
        namespace: Option<&str>,
    ) -> Result<(String, Option<String>), ParseError> {
        let raw = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingAttribute {
                kind,
                attribute: "name",
            })?;
        let explicit = obj.get("namespace").and_then(Value::as_str);
        let (name, ns) = split_fullname(raw, explicit.or(namespace));

        if !is_valid_name(&name) {
            return Err(ParseError::InvalidName(raw.to_string()));
        }
        if let Some(ns) = &ns {
            if !is_valid_namespace(ns) {
                return Err(ParseError::InvalidName(ns.clone()));
            }
        }
        Ok((name, ns))
    }

    fn parse_record(
        &mut self,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaNode, ParseError> {
        let (name, ns) = self.named(obj, "record", namespace)?;
        let full = fullname(&name, ns.as_deref());
        if let Some(existing) = self.names.get(&full) {
            return Ok(existing.clone());
        }

        let fields_json = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or(ParseError::MissingAttribute {
                kind: "record",
                attribute: "fields",
            })?;

        let props = obj
            .iter()
            .filter(|(key, _)| !RECORD_ATTRIBUTES.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let record = Rc::new(RecordSchema::new(&name, ns.clone(), doc_of(obj), props));

        // Register before the fields so they can refer back to this record.
        self.names.insert(full, SchemaNode::Record(Rc::clone(&record)));

        let mut fields = Vec::with_capacity(fields_json.len());
        for field in fields_json {
            fields.push(self.parse_field(field, ns.as_deref())?);
        }
        record.define_fields(fields);

        Ok(SchemaNode::Record(record))
    }

    fn parse_field(&mut self, json: &Value, namespace: Option<&str>) -> Result<Field, ParseError> {
        let obj = json
            .as_object()
            .ok_or_else(|| ParseError::InvalidSchema(format!("field is not an object: {json}")))?;
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingAttribute {
                kind: "field",
                attribute: "name",
            })?;
        let type_json = obj.get("type").ok_or(ParseError::MissingAttribute {
            kind: "field",
            attribute: "type",
        })?;

        Ok(Field {
            name: name.to_string(),
            field_type: self.parse_value(type_json, namespace)?,
            doc: doc_of(obj),
            default: obj.get("default").cloned(),
            props: obj
                .iter()
                .filter(|(key, _)| !FIELD_ATTRIBUTES.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        })
    }

    fn parse_enum(
        &mut self,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaNode, ParseError> {
        let (name, ns) = self.named(obj, "enum", namespace)?;
        let full = fullname(&name, ns.as_deref());
        if let Some(existing) = self.names.get(&full) {
            return Ok(existing.clone());
        }

        let symbols_json = obj
            .get("symbols")
            .and_then(Value::as_array)
            .ok_or(ParseError::MissingAttribute {
                kind: "enum",
                attribute: "symbols",
            })?;
        let mut symbols = Vec::with_capacity(symbols_json.len());
        for symbol in symbols_json {
            match symbol.as_str() {
                Some(s) => symbols.push(s.to_string()),
                None => {
                    return Err(ParseError::InvalidAttribute {
                        kind: "enum",
                        attribute: "symbols",
                        value: symbol.to_string(),
                    })
                }
            }
        }

        let node = SchemaNode::Enum(Rc::new(EnumSchema {
            name,
            namespace: ns,
            doc: doc_of(obj),
            symbols,
        }));
        self.names.insert(full, node.clone());
        Ok(node)
    }

    fn parse_fixed(
        &mut self,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaNode, ParseError> {
        let (name, ns) = self.named(obj, "fixed", namespace)?;
        let full = fullname(&name, ns.as_deref());
        if let Some(existing) = self.names.get(&full) {
            return Ok(existing.clone());
        }

        let size_json = obj.get("size").ok_or(ParseError::MissingAttribute {
            kind: "fixed",
            attribute: "size",
        })?;
        let size = size_json
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ParseError::InvalidAttribute {
                kind: "fixed",
                attribute: "size",
                value: size_json.to_string(),
            })?;

        let node = SchemaNode::Fixed(Rc::new(FixedSchema {
            name,
            namespace: ns,
            size,
        }));
        self.names.insert(full, node.clone());
        Ok(node)
    }
}

fn doc_of(obj: &Map<String, Value>) -> Option<String> {
    obj.get("doc").and_then(Value::as_str).map(str::to_string)
}
