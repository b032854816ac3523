//! @ai:module:intent Schema rewrites for strict-mode back-ends
//! @ai:module:layer domain
//! @ai:module:public_api adapt_for_strict_mode
//! @ai:module:stateless true

use crate::evaluator::is_schema_valid;
use crate::types::Schema;
use serde_json::Value;

/// @ai:intent Rewrite a schema into the shape strict structured-output APIs accept
///
/// Closes every object against additional properties, adds a root
/// `"type": "object"` when missing, and marks all declared properties
/// required. Warns when the rewrite produces a schema that no longer
/// compiles; the adapted schema is returned regardless so the refusal is
/// attributed to the back-end, not silently swallowed here.
/// @ai:effects pure
pub fn adapt_for_strict_mode(mut schema: Schema) -> Schema {
    set_additional_properties_false(&mut schema);
    add_root_type_if_missing(&mut schema);
    set_all_properties_required(&mut schema);

    if !is_schema_valid(&schema) {
        tracing::warn!("schema is no longer valid after strict-mode adaptation");
    }
    schema
}

/// @ai:intent Recursively close objects with declared properties
/// @ai:effects pure
fn set_additional_properties_false(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    let has_properties = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|p| !p.is_empty())
        .unwrap_or(false);

    let additional_open = map
        .get("additionalProperties")
        .map(|v| v != &Value::Bool(false))
        .unwrap_or(true);

    if has_properties && additional_open {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        for prop in properties.values_mut() {
            set_additional_properties_false(prop);
        }
    }

    if let Some(items) = map.get_mut("items") {
        set_additional_properties_false(items);
    }
}

/// @ai:intent Default the root to an object schema
/// @ai:effects pure
fn add_root_type_if_missing(schema: &mut Value) {
    if let Value::Object(map) = schema {
        if !map.contains_key("type") {
            map.insert("type".to_string(), Value::String("object".to_string()));
        }
    }
}

/// @ai:intent Mark every declared property required, recursively
/// @ai:effects pure
fn set_all_properties_required(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            if let Some(Value::Object(properties)) = map.get("properties") {
                let keys: Vec<Value> = properties
                    .keys()
                    .map(|k| Value::String(k.clone()))
                    .collect();
                map.insert("required".to_string(), Value::Array(keys));
            }

            for value in map.values_mut() {
                set_all_properties_required(value);
            }
        }
        Value::Array(items) => {
            for item in items {
                set_all_properties_required(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_closes_additional_properties_recursively() {
        let schema = adapt_for_strict_mode(json!({
            "type": "object",
            "properties": {
                "nested": {
                    "type": "object",
                    "properties": {"x": {"type": "integer"}}
                }
            }
        }));

        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["nested"]["additionalProperties"], json!(false));
    }

    #[test]
    fn test_respects_explicit_open_objects_without_properties() {
        let schema = adapt_for_strict_mode(json!({"type": "object"}));
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_adds_root_type() {
        let schema = adapt_for_strict_mode(json!({
            "properties": {"a": {"type": "string"}}
        }));
        assert_eq!(schema["type"], json!("object"));
    }

    #[test]
    fn test_all_properties_become_required() {
        let schema = adapt_for_strict_mode(json!({
            "type": "object",
            "properties": {
                "a": {"type": "string"},
                "b": {"type": "integer"}
            },
            "required": ["a"]
        }));

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&json!("a")));
        assert!(required.contains(&json!("b")));
    }

    #[test]
    fn test_descends_into_array_items() {
        let schema = adapt_for_strict_mode(json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {"name": {"type": "string"}}
            }
        }));

        assert_eq!(schema["items"]["additionalProperties"], json!(false));
        assert_eq!(schema["items"]["required"], json!(["name"]));
    }

    #[test]
    fn test_adapted_plain_schema_still_compiles() {
        let schema = adapt_for_strict_mode(json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}}
        }));
        assert!(is_schema_valid(&schema));
    }
}
