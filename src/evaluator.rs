//! @ai:module:intent Schema-conformance verdicts for generation records
//! @ai:module:layer application
//! @ai:module:public_api is_schema_valid, validate_instance, evaluate_record, evaluate_records
//! @ai:module:stateless true

use crate::types::{GenerationOutput, Schema};
use jsonschema::{Draft, Validator};
use serde_json::Value;

/// @ai:intent Compile a schema under Draft 2020-12 with format assertions
///
/// Format assertions cover ipv4/ipv6/uuid and friends, which several splits
/// (Kubernetes, Snowplow) rely on.
fn compile(schema: &Schema) -> Option<Validator> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .build(schema)
        .ok()
}

/// @ai:intent Whether the schema itself compiles
/// @ai:effects pure
pub fn is_schema_valid(schema: &Schema) -> bool {
    compile(schema).is_some()
}

/// @ai:intent Whether an instance conforms to a schema
///
/// Any compile or validation failure counts as non-conformance; nothing here
/// may abort the benchmark loop.
/// @ai:effects pure
pub fn validate_instance(instance: &Value, schema: &Schema) -> bool {
    match compile(schema) {
        Some(validator) => validator.is_valid(instance),
        None => false,
    }
}

/// @ai:intent Record the pass/fail verdict for one generation
///
/// A record without a generation keeps `valid: None`; the failure is already
/// captured in its status fields. A generation that does not parse as JSON or
/// does not conform is a fail.
/// @ai:effects pure
pub fn evaluate_record(output: &mut GenerationOutput) {
    let Some(generation) = output.generation.as_deref() else {
        return;
    };

    let verdict = match serde_json::from_str::<Value>(generation) {
        Ok(instance) => validate_instance(&instance, &output.schema),
        Err(_) => false,
    };

    output.metadata.valid = Some(verdict);
}

/// @ai:intent Re-score a batch of loaded records in place
///
/// Saved runs may come from harnesses that never wrote verdict fields; every
/// record with a generation gets a fresh verdict here.
/// @ai:effects pure
pub fn evaluate_records(outputs: &mut [GenerationOutput]) {
    for output in outputs {
        evaluate_record(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn required_int_schema() -> Schema {
        json!({
            "type": "object",
            "required": ["a"],
            "properties": {"a": {"type": "integer"}}
        })
    }

    #[test]
    fn test_conforming_instance_passes() {
        assert!(validate_instance(&json!({"a": 1}), &required_int_schema()));
    }

    #[test]
    fn test_wrong_type_fails() {
        assert!(!validate_instance(&json!({"a": "x"}), &required_int_schema()));
    }

    #[test]
    fn test_missing_required_fails() {
        assert!(!validate_instance(&json!({}), &required_int_schema()));
    }

    #[test]
    fn test_invalid_schema_never_validates() {
        let broken = json!({"type": "not-a-type"});
        assert!(!is_schema_valid(&broken));
        assert!(!validate_instance(&json!({}), &broken));
    }

    #[test]
    fn test_format_assertions_enabled() {
        let schema = json!({"type": "string", "format": "ipv4"});
        assert!(validate_instance(&json!("192.168.1.1"), &schema));
        assert!(!validate_instance(&json!("not-an-ip"), &schema));
    }

    #[test]
    fn test_evaluate_record_sets_verdict() {
        let mut output = GenerationOutput::new(
            "Github_easy",
            "gh-1",
            vec![],
            required_int_schema(),
        );

        evaluate_record(&mut output);
        assert_eq!(output.metadata.valid, None);

        output.generation = Some("{\"a\": 1}".to_string());
        evaluate_record(&mut output);
        assert_eq!(output.metadata.valid, Some(true));

        output.generation = Some("{\"a\": \"x\"}".to_string());
        evaluate_record(&mut output);
        assert_eq!(output.metadata.valid, Some(false));

        output.generation = Some("not json {{".to_string());
        evaluate_record(&mut output);
        assert_eq!(output.metadata.valid, Some(false));
    }

    #[test]
    fn test_loaded_records_without_verdicts_rescore() {
        // a saved run from another harness: conforming generation, no verdict
        let mut foreign = GenerationOutput::new(
            "Snowplow",
            "sp-7",
            vec![],
            required_int_schema(),
        );
        foreign.generation = Some("{\"a\": 1}".to_string());
        assert_eq!(foreign.metadata.valid, None);

        let mut outputs = vec![foreign];
        evaluate_records(&mut outputs);
        assert_eq!(outputs[0].metadata.valid, Some(true));

        let summary = crate::metrics::summarize_task("Snowplow", &outputs);
        assert_eq!(summary.empirical_coverage, Some(1.0));
    }
}
