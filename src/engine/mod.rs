//! @ai:module:intent Engine capability interface for structured-output back-ends
//! @ai:module:layer domain
//! @ai:module:public_api Engine, EngineKind
//! @ai:module:stateless false

pub mod mock;
pub mod openai;
pub mod rate_limiter;
pub mod schema;

pub use mock::MockEngine;
pub use openai::OpenAiEngine;

use crate::dataset::Task;
use crate::errors::BenchError;
use crate::messages::Message;
use crate::types::{
    CompileStatus, CompileStatusCode, GenerationOutput, PerfMetrics, Schema,
};
use std::time::Instant;

/// @ai:intent A structured-generation back-end
///
/// Implementors provide the back-end call (`generate_inner`) and a context
/// limit; everything else has a default. The provided `generate` wrapper owns
/// record construction, timing, and error capture so a back-end failure never
/// escapes past the driver boundary.
#[allow(async_fn_in_trait)]
pub trait Engine: Send {
    /// Engine name used in output paths and report headers.
    fn name(&self) -> &'static str;

    /// @ai:intent Back-end call that fills `generation` and token usage in place
    ///
    /// On failure the implementation should record a status code on the output
    /// and return the error; the wrapper keeps the record either way.
    async fn generate_inner(&mut self, output: &mut GenerationOutput) -> Result<(), BenchError>;

    /// Maximum context length in tokens; the driver skips oversized prompts.
    fn max_context_length(&self) -> usize;

    /// @ai:intent Rewrite schema constructs the back-end cannot support
    /// @ai:effects pure
    fn adapt_schema(&self, schema: Schema) -> Schema {
        schema
    }

    /// @ai:intent Encode text with the engine's native tokenizer, if any
    /// @ai:effects pure
    fn encode(&self, _text: &str) -> Option<Vec<u32>> {
        None
    }

    /// @ai:intent Decode token ids with the engine's native tokenizer, if any
    /// @ai:effects pure
    fn decode(&self, _ids: &[u32]) -> Option<String> {
        None
    }

    /// @ai:intent Token count, falling back to whitespace tokenization
    /// @ai:effects pure
    fn count_tokens(&self, text: &str) -> usize {
        match self.encode(text) {
            Some(ids) => ids.len(),
            None => text.split_whitespace().count(),
        }
    }

    /// @ai:intent Release back-end resources (model handles, connections)
    ///
    /// The driver calls this exactly once per instance.
    fn close(&mut self) -> Result<(), BenchError> {
        Ok(())
    }

    /// @ai:intent Run one generation and always return a populated record
    ///
    /// Adapts the schema, delegates to `generate_inner`, measures wall-clock
    /// time, and captures any back-end error in the record's status fields.
    /// @ai:effects network, time
    async fn generate(
        &mut self,
        task: Task,
        unique_id: &str,
        messages: Vec<Message>,
        schema: Schema,
    ) -> GenerationOutput {
        let schema = self.adapt_schema(schema);
        let mut output = GenerationOutput::new(task.as_str(), unique_id, messages, schema);

        let start = Instant::now();
        if let Err(e) = self.generate_inner(&mut output).await {
            tracing::warn!("{} generation failed for {}: {}", self.name(), unique_id, e);

            // Keep a status the implementation may already have set.
            if output.metadata.compile_status.code == CompileStatusCode::Tbd {
                output.metadata.compile_status =
                    CompileStatus::failed(CompileStatusCode::UnknownError, e.to_string());
            }
        }
        let total_time = start.elapsed().as_secs_f64();

        output.perf_metrics = PerfMetrics::from_timestamps(
            output.metadata.grammar_compilation_end_time,
            output.metadata.first_token_arrival_time,
            total_time,
            output.token_usage.output_tokens,
        );
        output
    }
}

/// @ai:intent Sealed set of selectable engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    OpenAi,
    Mock,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::OpenAi => "openai",
            EngineKind::Mock => "mock",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(EngineKind::OpenAi),
            "mock" => Ok(EngineKind::Mock),
            other => Err(format!("unknown engine '{}', available: openai, mock", other)),
        }
    }
}
