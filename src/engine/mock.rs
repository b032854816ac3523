//! @ai:module:intent Deterministic stub engine for dry runs and tests
//! @ai:module:layer infrastructure
//! @ai:module:public_api MockEngine
//! @ai:module:stateless false

use crate::config::MockConfig;
use crate::engine::Engine;
use crate::errors::BenchError;
use crate::types::{
    CompileStatus, CompileStatusCode, DecodingStatus, GenerationOutput,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// @ai:intent Stub engine that returns a canned generation for every schema
///
/// Deterministic by construction, so repeated runs over the same split yield
/// identical validation verdicts. `close_calls` is shared so tests can assert
/// the exactly-once close guarantee after the driver consumed the engine.
pub struct MockEngine {
    config: MockConfig,
    close_calls: Arc<AtomicUsize>,
    fail_on_close: bool,
}

impl MockEngine {
    /// @ai:effects pure
    pub fn new(config: MockConfig) -> Result<Self, BenchError> {
        config.validate()?;
        Ok(Self {
            config,
            close_calls: Arc::new(AtomicUsize::new(0)),
            fail_on_close: false,
        })
    }

    /// @ai:intent Handle for observing close calls from tests
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.close_calls)
    }

    /// @ai:intent Make `close` report a resource failure
    pub fn with_failing_close(mut self) -> Self {
        self.fail_on_close = true;
        self
    }
}

impl Engine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    /// @ai:intent Fill the record with the canned generation, or an injected failure
    /// @ai:effects pure
    async fn generate_inner(&mut self, output: &mut GenerationOutput) -> Result<(), BenchError> {
        if self.config.fail {
            output.metadata.compile_status = CompileStatus::failed(
                CompileStatusCode::UnknownError,
                "injected mock failure",
            );
            return Err(BenchError::Generation("injected mock failure".to_string()));
        }

        let prompt: String = output
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        output.token_usage.input_tokens = self.count_tokens(&prompt) as u64;
        output.token_usage.output_tokens = self.count_tokens(&self.config.generation) as u64;
        output.generation = Some(self.config.generation.clone());
        output.metadata.compile_status = CompileStatus::ok();
        output.metadata.decoding_status = DecodingStatus::ok();
        Ok(())
    }

    fn max_context_length(&self) -> usize {
        self.config.max_context_length
    }

    /// @ai:intent Count the call for the exactly-once guarantee
    /// @ai:effects state:write
    fn close(&mut self) -> Result<(), BenchError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_close {
            return Err(BenchError::Resource(
                "injected close failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Task;
    use crate::messages::Message;

    #[tokio::test]
    async fn test_mock_returns_canned_generation() {
        let mut engine = MockEngine::new(MockConfig {
            generation: "{\"a\": 1}".to_string(),
            ..Default::default()
        })
        .unwrap();

        let output = engine
            .generate(
                Task::Default,
                "d-1",
                vec![Message::user("one two three")],
                serde_json::json!({"type": "object"}),
            )
            .await;

        assert_eq!(output.generation.as_deref(), Some("{\"a\": 1}"));
        assert_eq!(output.token_usage.input_tokens, 3);
    }

    #[test]
    fn test_close_counter_increments() {
        let mut engine = MockEngine::new(MockConfig::default()).unwrap();
        let counter = engine.close_counter();

        engine.close().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_close_reports_resource_error() {
        let mut engine = MockEngine::new(MockConfig::default())
            .unwrap()
            .with_failing_close();
        assert!(matches!(engine.close(), Err(BenchError::Resource(_))));
    }
}
