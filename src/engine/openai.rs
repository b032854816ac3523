//! @ai:module:intent OpenAI-compatible chat-completions engine
//! @ai:module:layer infrastructure
//! @ai:module:public_api OpenAiEngine
//! @ai:module:stateless false

use crate::config::OpenAiConfig;
use crate::engine::rate_limiter::RateLimiter;
use crate::engine::{schema, Engine};
use crate::errors::BenchError;
use crate::messages::Message;
use crate::types::{
    CompileStatus, CompileStatusCode, DecodingStatus, DecodingStatusCode, GenerationOutput, Schema,
};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// @ai:intent Chat-completions request with a JSON Schema response format
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    response_format: ResponseFormat<'a>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaSpec<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaSpec<'a> {
    name: &'static str,
    schema: &'a Schema,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

/// @ai:intent Engine backed by an OpenAI-compatible chat-completions API
///
/// Works against api.openai.com or any provider exposing the same surface via
/// `base_url`. No native tokenizer is available over HTTP, so `count_tokens`
/// keeps the whitespace fallback and usage comes from the response.
pub struct OpenAiEngine {
    config: OpenAiConfig,
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    api_key: String,
}

impl OpenAiEngine {
    /// @ai:intent Construct a validated engine instance
    /// @ai:pre the configured API key environment variable is set
    /// @ai:effects env
    pub fn new(config: OpenAiConfig) -> Result<Self, BenchError> {
        config.validate()?;

        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            BenchError::Config(format!("{} not set in environment", config.api_key_env))
        })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| BenchError::Config(format!("failed to build HTTP client: {}", e)))?;

        let rate_limiter = RateLimiter::new(config.requests_per_minute);

        Ok(Self {
            config,
            client,
            rate_limiter,
            api_key,
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

impl Engine for OpenAiEngine {
    fn name(&self) -> &'static str {
        "openai"
    }

    /// @ai:intent One constrained chat completion; statuses recorded on the output
    /// @ai:effects network
    async fn generate_inner(&mut self, output: &mut GenerationOutput) -> Result<(), BenchError> {
        self.rate_limiter.wait().await;

        let request = ChatRequest {
            model: &self.config.model,
            messages: &output.messages,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaSpec {
                    name: "json_schema",
                    schema: &output.schema,
                },
            },
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = match self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                output.metadata.compile_status =
                    CompileStatus::failed(CompileStatusCode::ApiBadResponse, e.to_string());
                return Err(BenchError::Generation(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Strict-mode schema refusals come back as 4xx with a message.
            let code = if status.is_client_error() {
                CompileStatusCode::UnsupportedSchema
            } else {
                CompileStatusCode::ApiBadResponse
            };
            output.metadata.compile_status =
                CompileStatus::failed(code, format!("{}: {}", status, body));
            return Err(BenchError::Generation(format!("API error {}", status)));
        }

        output.metadata.compile_status = CompileStatus::ok();

        let parsed: ChatResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                output.metadata.decoding_status =
                    DecodingStatus::failed(DecodingStatusCode::BadApiResponse, e.to_string());
                return Err(BenchError::Generation(e.to_string()));
            }
        };

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        let Some(content) = content else {
            output.metadata.decoding_status = DecodingStatus::failed(
                DecodingStatusCode::BadApiResponse,
                "response carried no message content",
            );
            return Err(BenchError::Generation("empty completion".to_string()));
        };

        if let Some(usage) = parsed.usage {
            output.token_usage.input_tokens = usage.prompt_tokens;
            output.token_usage.output_tokens = usage.completion_tokens;
        }

        output.generation = Some(content);
        output.metadata.decoding_status = DecodingStatus::ok();
        Ok(())
    }

    /// @ai:intent Context window for the configured model
    /// @ai:effects pure
    fn max_context_length(&self) -> usize {
        match self.config.model.as_str() {
            m if m.starts_with("gpt-4o") => 128_000,
            m if m.starts_with("gpt-4-turbo") => 128_000,
            m if m.starts_with("gpt-4") => 8_192,
            m if m.starts_with("gpt-3.5-turbo") => 16_385,
            _ => 128_000,
        }
    }

    /// @ai:intent Strict-mode APIs demand closed, fully-required object schemas
    /// @ai:effects pure
    fn adapt_schema(&self, schema: Schema) -> Schema {
        schema::adapt_for_strict_mode(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(config: OpenAiConfig) -> OpenAiEngine {
        std::env::set_var("SCHEMABENCH_TEST_KEY", "sk-test");
        let config = OpenAiConfig {
            api_key_env: "SCHEMABENCH_TEST_KEY".to_string(),
            ..config
        };
        OpenAiEngine::new(config).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = OpenAiConfig {
            api_key_env: "SCHEMABENCH_DEFINITELY_UNSET".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            OpenAiEngine::new(config),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_respects_base_url() {
        let engine = engine_with(OpenAiConfig {
            base_url: Some("http://localhost:8000/v1/".to_string()),
            ..Default::default()
        });
        assert_eq!(engine.endpoint(), "http://localhost:8000/v1/chat/completions");

        let engine = engine_with(OpenAiConfig::default());
        assert_eq!(
            engine.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_max_context_length_per_model() {
        let engine = engine_with(OpenAiConfig {
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        });
        assert_eq!(engine.max_context_length(), 128_000);

        let engine = engine_with(OpenAiConfig {
            model: "gpt-3.5-turbo".to_string(),
            ..Default::default()
        });
        assert_eq!(engine.max_context_length(), 16_385);
    }

    #[test]
    fn test_request_serializes_schema_format() {
        let schema = serde_json::json!({"type": "object"});
        let messages = vec![Message::user("{}")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaSpec {
                    name: "json_schema",
                    schema: &schema,
                },
            },
            temperature: 0.0,
            max_tokens: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["type"],
            "object"
        );
        assert!(body.get("max_tokens").is_none());
    }
}
