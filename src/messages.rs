//! @ai:module:intent Chat message types and few-shot prompt construction
//! @ai:module:layer domain
//! @ai:module:public_api Message, Role, few_shot_messages
//! @ai:module:stateless true

use crate::dataset::Task;
use crate::types::Schema;
use serde::{Deserialize, Serialize};

/// @ai:intent Chat role understood by every supported back-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// @ai:intent One chat message sent to or produced by an engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

const SYSTEM_INSTRUCTION: &str =
    "You need to generate a JSON object that matches the schema below.";

/// @ai:intent Build the few-shot prompt for one schema
///
/// System instruction, then the task's example (schema, instance) pairs as
/// user/assistant turns, then the target schema as the final user message.
/// @ai:effects pure
pub fn few_shot_messages(task: Task, schema: &Schema) -> Vec<Message> {
    let mut messages = vec![Message::system(SYSTEM_INSTRUCTION)];

    for (input, output) in examples_for_task(task) {
        messages.push(Message::user(*input));
        messages.push(Message::assistant(*output));
    }

    messages.push(Message::user(
        serde_json::to_string(schema).unwrap_or_default(),
    ));
    messages
}

/// @ai:intent Few-shot example pairs per benchmark split
/// @ai:effects pure
fn examples_for_task(task: Task) -> &'static [(&'static str, &'static str)] {
    match task {
        Task::Snowplow => SNOWPLOW_EXAMPLES,
        Task::GithubTrivial
        | Task::GithubEasy
        | Task::GithubMedium
        | Task::GithubHard
        | Task::GithubUltra => GITHUB_EXAMPLES,
        Task::Glaiveai2K => GLAIVEAI_EXAMPLES,
        Task::JsonSchemaStore => SCHEMASTORE_EXAMPLES,
        Task::Kubernetes => KUBERNETES_EXAMPLES,
        Task::WashingtonPost => WASHINGTONPOST_EXAMPLES,
        Task::Default => &[],
    }
}

const SNOWPLOW_EXAMPLES: &[(&str, &str)] = &[
    (
        r#"{"additionalProperties": false, "description": "Schema for a JSON Paths file for loading Redshift from JSON or Avro", "properties": {"jsonpaths": {"items": {"type": "string"}, "minItems": 1, "type": "array"}}, "required": ["jsonpaths"], "type": "object"}"#,
        r#"{"jsonpaths": ["$.user.id", "$.user.name", "$.user.address.street"]}"#,
    ),
    (
        r#"{"additionalProperties": false, "description": "Schema for a Google Analytics enhanced e-commerce product impression custom metric entity", "properties": {"customMetricIndex": {"maximum": 200, "minimum": 1, "type": "integer"}, "listIndex": {"maximum": 200, "minimum": 1, "type": "integer"}, "productIndex": {"maximum": 200, "minimum": 1, "type": "integer"}, "value": {"type": ["integer", "null"]}}, "type": "object"}"#,
        r#"{"customMetricIndex": 120, "listIndex": 45, "productIndex": 10, "value": 300}"#,
    ),
];

const GITHUB_EXAMPLES: &[(&str, &str)] = &[
    (
        r##"{"$schema": "http://json-schema.org/draft-04/schema#", "definitions": {"address1": {"type": "string"}, "address2": {"type": "string"}, "city": {"type": "string"}, "country": {"type": "string"}, "postalCode": {"type": "string"}, "state": {"type": "string"}}, "description": "A simple address schema", "properties": {"address1": {"$ref": "#/definitions/address1"}, "address2": {"$ref": "#/definitions/address2"}, "city": {"$ref": "#/definitions/city"}, "country": {"$ref": "#/definitions/country"}, "postalCode": {"$ref": "#/definitions/postalCode"}, "state": {"$ref": "#/definitions/state"}}, "type": "object"}"##,
        r#"{"address1": "123 Main Street", "address2": "Apt 4B", "city": "Seattle", "country": "USA", "postalCode": "98101", "state": "WA"}"#,
    ),
    (
        r##"{"$schema": "http://json-schema.org/draft-06/schema#", "definitions": {"ElementType": {"enum": ["component", "directive"], "type": "string"}, "SelectorChange": {"properties": {"remove": {"description": "Remove directive/component", "type": "boolean"}, "replaceWith": {"description": "Replace original selector with new one", "type": "string"}, "selector": {"description": "Original selector to apply change to", "type": "string"}, "type": {"$ref": "#/definitions/ElementType"}}, "required": ["selector", "type"], "type": "object"}}, "properties": {"changes": {"items": {"$ref": "#/definitions/SelectorChange"}, "type": "array"}}, "required": ["changes"], "type": "object"}"##,
        r#"{"changes": [{"selector": "app-root", "type": "component", "remove": false, "replaceWith": "new-root"}, {"selector": "my-directive", "type": "directive", "remove": true, "replaceWith": "new-directive"}]}"#,
    ),
];

const GLAIVEAI_EXAMPLES: &[(&str, &str)] = &[
    (
        r#"{"properties": {"username": {"description": "The user's username", "type": "string"}, "email": {"description": "The user's email address", "type": "string"}, "age": {"description": "The user's age", "type": "integer"}, "is_active": {"description": "Whether the user is active", "type": "boolean"}}, "required": ["username", "email"], "type": "object"}"#,
        r#"{"username": "johndoe", "email": "john@example.com", "age": 30, "is_active": true}"#,
    ),
    (
        r#"{"properties": {"product_id": {"description": "The ID of the product", "type": "string"}, "rating": {"description": "The rating given by the user", "type": "integer"}, "comments": {"description": "Additional comments about the product", "type": "string"}}, "required": ["product_id", "rating"], "type": "object"}"#,
        r#"{"product_id": "12345", "rating": 5, "comments": "Excellent product! Highly recommend."}"#,
    ),
];

const SCHEMASTORE_EXAMPLES: &[(&str, &str)] = &[
    (
        r##"{"$id": "https://json.schemastore.org/minecraft-trim-pattern.json", "$schema": "http://json-schema.org/draft-07/schema#", "description": "A trim pattern for a Minecraft data pack config schema", "properties": {"asset_id": {"type": "string"}, "description": {"properties": {"color": {"type": "string"}, "translate": {"type": "string"}}, "required": ["translate"], "type": "object"}, "template_item": {"type": "string"}}, "required": ["asset_id", "description", "template_item"], "title": "Minecraft Data Pack Trim Pattern", "type": "object"}"##,
        r##"{"asset_id": "minecraft:trim_pattern", "description": {"color": "#FFAA00", "translate": "trim_pattern.description"}, "template_item": "minecraft:template_item"}"##,
    ),
    (
        r##"{"$id": "https://json.schemastore.org/minecraft-damage-type.json", "$schema": "http://json-schema.org/draft-07/schema#", "description": "A damage type for a Minecraft data pack config schema", "properties": {"death_message_type": {"enum": ["default", "fall_variants", "intentional_game_design"], "type": "string"}, "effects": {"enum": ["hurt", "thorns", "drowning", "burning", "poking", "freezing"], "type": "string"}, "exhaustion": {"type": "number"}, "message_id": {"type": "string"}, "scaling": {"enum": ["never", "always", "when_caused_by_living_non_player"], "type": "string"}}, "required": ["message_id", "scaling", "exhaustion"], "title": "Minecraft Data Pack Damage Type", "type": "object"}"##,
        r#"{"message_id": "minecraft:damage.message", "scaling": "always", "exhaustion": 0.3, "death_message_type": "default", "effects": "hurt"}"#,
    ),
];

const KUBERNETES_EXAMPLES: &[(&str, &str)] = &[
    (
        r#"{"description": "A topology selector requirement is a selector that matches given label.", "properties": {"key": {"description": "The label key that the selector applies to.", "type": ["string", "null"]}, "values": {"description": "An array of string values. One value must match the label to be selected.", "items": {"type": ["string", "null"]}, "type": ["array", "null"]}}, "required": ["key", "values"], "type": "object"}"#,
        r#"{"key": "region", "values": ["us-west-1", "us-east-1"]}"#,
    ),
    (
        r#"{"description": "HostAlias holds the mapping between IP and hostnames that will be injected as an entry in the pod's hosts file.", "properties": {"hostnames": {"description": "Hostnames for the above IP address.", "items": {"type": ["string", "null"]}, "type": ["array", "null"]}, "ip": {"description": "IP address of the host file entry.", "type": ["string", "null"]}}, "type": "object"}"#,
        r#"{"ip": "192.168.1.1", "hostnames": ["example.com", "test.com"]}"#,
    ),
];

const WASHINGTONPOST_EXAMPLES: &[(&str, &str)] = &[
    (
        r#"{"additionalProperties": false, "description": "Models a auxiliary used in targeting a piece of content.", "properties": {"_id": {"description": "The unique identifier for this auxiliary.", "type": "string"}, "name": {"description": "The general name for this auxiliary.", "type": "string"}, "uid": {"description": "A short identifier for this auxiliary.", "type": "string"}}, "required": ["_id", "uid"], "title": "Auxiliary", "type": "object"}"#,
        r#"{"_id": "12345", "uid": "aux123", "name": "Sample Auxiliary"}"#,
    ),
    (
        r#"{"additionalProperties": {}, "description": "Comment configuration data", "properties": {"allow_comments": {"description": "If false, commenting is disabled on this content.", "type": "boolean"}, "comments_period": {"description": "How long (in days) after publish date until comments are closed.", "type": "integer"}, "display_comments": {"description": "If false, do not render comments on this content.", "type": "boolean"}, "moderation_required": {"description": "If true, comments must be moderator-approved before being displayed.", "type": "boolean"}}, "title": "Comments", "type": "object"}"#,
        r#"{"allow_comments": true, "comments_period": 30, "display_comments": true, "moderation_required": false}"#,
    ),
];
