use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::avro::SchemaNode;
use crate::error::ParseError;
use crate::parser::schema::SchemaParser;

/// A parsed `.avpr` protocol. Messages are not interpreted.
#[derive(Debug, Clone)]
pub struct Protocol {
    pub name: String,
    pub namespace: Option<String>,
    /// Named types in declaration order.
    pub types: Vec<SchemaNode>,
}

#[derive(Deserialize)]
struct RawProtocol {
    #[serde(default)]
    types: Vec<Value>,
}

/// Parse `.avpr` protocol text.
pub fn parse_protocol(text: &str) -> Result<Protocol, ParseError> {
    let json: Value = serde_json::from_str(text)?;
    Protocol::from_json(&json)
}

/// Map each type `name` in the protocol's raw `types` list to its `topic`.
///
/// Only objects carrying both keys contribute; the names are taken as written,
/// short or dotted.
pub fn name_to_topic_map(text: &str) -> Result<IndexMap<String, String>, ParseError> {
    let raw: RawProtocol = serde_json::from_str(text)?;
    Ok(raw
        .types
        .iter()
        .filter_map(|t| {
            let name = t.get("name").and_then(Value::as_str)?;
            let topic = t.get("topic").and_then(Value::as_str)?;
            Some((name.to_string(), topic.to_string()))
        })
        .collect())
}

impl Protocol {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        let name = json
            .get("protocol")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingAttribute {
                kind: "protocol",
                attribute: "protocol",
            })?
            .to_string();
        let namespace = json
            .get("namespace")
            .and_then(Value::as_str)
            .filter(|ns| !ns.is_empty())
            .map(str::to_string);

        let mut parser = SchemaParser::new();
        let mut types = Vec::new();
        if let Some(raw_types) = json.get("types") {
            let raw_types = raw_types.as_array().ok_or_else(|| ParseError::InvalidAttribute {
                kind: "protocol",
                attribute: "types",
                value: raw_types.to_string(),
            })?;
            for raw in raw_types {
                types.push(parser.parse_value(raw, namespace.as_deref())?);
            }
        }

        Ok(Self {
            name,
            namespace,
            types,
        })
    }

    /// Find a declared type by short name or fullname.
    pub fn find_type(&self, name: &str) -> Option<&SchemaNode> {
        self.types
            .iter()
            .find(|t| t.name() == Some(name) || t.fullname().as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avro::SchemaKind;

    const ORDERS: &str = r#"{
        "protocol": "Orders",
        "namespace": "com.acme.orders",
        "types": [
            {"type": "enum", "name": "Status", "symbols": ["NEW", "PAID"]},
            {"type": "record", "name": "Line", "fields": [{"name": "sku", "type": "string"}]},
            {"type": "record", "name": "OrderCreated", "topic": "/orders/new", "fields": [
                {"name": "status", "type": "Status"},
                {"name": "lines", "type": {"type": "array", "items": "Line"}}
            ]}
        ],
        "messages": {}
    }"#;

    #[test]
    fn parses_types_in_protocol_namespace() {
        let protocol = parse_protocol(ORDERS).unwrap();
        assert_eq!(protocol.name, "Orders");
        assert_eq!(protocol.namespace.as_deref(), Some("com.acme.orders"));
        assert_eq!(protocol.types.len(), 3);

        let order = protocol.find_type("OrderCreated").unwrap();
        assert_eq!(order.kind(), SchemaKind::Record);
        assert_eq!(order.fullname().as_deref(), Some("com.acme.orders.OrderCreated"));
        assert!(protocol.find_type("com.acme.orders.Status").is_some());
        assert!(protocol.find_type("Missing").is_none());
    }

    #[test]
    fn topic_map_only_keeps_types_with_topics() {
        let topics = name_to_topic_map(ORDERS).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics.get("OrderCreated").map(String::as_str), Some("/orders/new"));
    }

    #[test]
    fn protocol_without_types_is_empty() {
        let text = r#"{"protocol": "Empty"}"#;
        assert!(parse_protocol(text).unwrap().types.is_empty());
        assert!(name_to_topic_map(text).unwrap().is_empty());
    }

    #[test]
    fn protocol_name_is_required() {
        assert!(matches!(
            parse_protocol(r#"{"types": []}"#),
            Err(ParseError::MissingAttribute { kind: "protocol", .. })
        ));
    }
}
