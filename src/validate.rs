use apache_avro::types::Value as AvroValue;
use apache_avro::Schema;
use serde_json::Value;

use crate::error::ValidationError;

/// Check that `sample` resolves against the schema in `schema_text`.
///
/// Both sides go through `apache-avro`, so this also confirms that the
/// serialized schema is acceptable to an independent Avro implementation.
pub fn validate_sample(schema_text: &str, sample: &Value) -> Result<(), ValidationError> {
    let schema = Schema::parse_str(schema_text).map_err(ValidationError::Schema)?;
    AvroValue::from(sample.clone())
        .resolve(&schema)
        .map(|_| ())
        .map_err(ValidationError::Datum)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parser::parse_schema;
    use crate::sample::generate_sample;
    use crate::serializer::serialize_schema;

    const SHIPMENT: &str = r#"{
        "type": "record", "name": "Shipment", "namespace": "com.acme.logistics",
        "fields": [
            {"name": "id", "type": "string"},
            {"name": "count", "type": "int"},
            {"name": "weight", "type": "double"},
            {"name": "express", "type": "boolean"},
            {"name": "carrier", "type": {"type": "enum", "name": "Carrier", "symbols": ["UPS", "DHL"]}},
            {"name": "origin", "type": {"type": "record", "name": "Place", "fields": [
                {"name": "city", "type": "string"}
            ]}},
            {"name": "destination", "type": "Place"},
            {"name": "notes", "type": {"type": "array", "items": "string"}},
            {"name": "reference", "type": ["null", "string"]}
        ]
    }"#;

    #[test]
    fn generated_sample_matches_serialized_schema() {
        let node = parse_schema(SHIPMENT).unwrap();
        let text = serialize_schema(&node, "");
        let sample = generate_sample(&node).unwrap();
        validate_sample(&text, &sample).unwrap();
    }

    #[test]
    fn mismatched_sample_is_rejected() {
        let schema = r#"{"type": "record", "name": "Counter", "fields": [{"name": "n", "type": "int"}]}"#;
        assert!(matches!(
            validate_sample(schema, &json!({"n": "not a number"})),
            Err(ValidationError::Datum(_))
        ));
    }

    #[test]
    fn invalid_schema_text_is_rejected() {
        assert!(matches!(
            validate_sample(r#"{"type": "nope"}"#, &json!(null)),
            Err(ValidationError::Schema(_))
        ));
    }
}
