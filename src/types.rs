//! @ai:module:intent Core record types for generation runs
//! @ai:module:layer domain
//! @ai:module:public_api Schema, GenerationOutput, TokenUsage, PerfMetrics
//! @ai:module:stateless true

use crate::messages::Message;
use serde::{Deserialize, Serialize};

/// A JSON Schema document. Immutable once loaded from a task file.
pub type Schema = serde_json::Value;

/// @ai:intent Outcome of preparing a schema for the back-end (grammar
///            compilation, strict-mode request construction, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileStatusCode {
    Tbd,
    Ok,
    UnsupportedSchema,
    RuntimeGrammarError,
    ApiBadResponse,
    PromptTooLong,
    CompileTimeout,
    RuntimeTimeout,
    UnknownError,
}

/// @ai:intent Outcome of the decoding phase of one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodingStatusCode {
    Tbd,
    Ok,
    ExceedingMaxCtx,
    DecodingTimeout,
    BadApiResponse,
    UnknownError,
}

/// @ai:intent Compile status with optional back-end message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileStatus {
    pub code: CompileStatusCode,
    pub message: Option<String>,
}

impl CompileStatus {
    pub fn ok() -> Self {
        Self {
            code: CompileStatusCode::Ok,
            message: None,
        }
    }

    pub fn failed(code: CompileStatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }
}

impl Default for CompileStatus {
    fn default() -> Self {
        Self {
            code: CompileStatusCode::Tbd,
            message: None,
        }
    }
}

/// @ai:intent Decoding status with optional back-end message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodingStatus {
    pub code: DecodingStatusCode,
    pub message: Option<String>,
}

impl DecodingStatus {
    pub fn ok() -> Self {
        Self {
            code: DecodingStatusCode::Ok,
            message: None,
        }
    }

    pub fn failed(code: DecodingStatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }
}

impl Default for DecodingStatus {
    fn default() -> Self {
        Self {
            code: DecodingStatusCode::Tbd,
            message: None,
        }
    }
}

/// @ai:intent Token counts for one generation (or a whole run when summed)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// @ai:intent Accumulate usage across generations
    /// @ai:effects pure
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
    }
}

impl std::fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "token usage: {} input, {} output",
            self.input_tokens, self.output_tokens
        )
    }
}

/// @ai:intent A single generated token, as much as the back-end reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Token {
    pub id: Option<u32>,
    pub text: Option<String>,
    pub logprob: Option<f64>,
}

/// @ai:intent Timestamps and statuses collected while a generation runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Seconds from generation start to the first token, when streamed.
    pub first_token_arrival_time: Option<f64>,
    /// Seconds from generation start to the end of grammar compilation.
    pub grammar_compilation_end_time: Option<f64>,
    #[serde(default)]
    pub compile_status: CompileStatus,
    #[serde(default)]
    pub decoding_status: DecodingStatus,
    /// Schema-conformance verdict, set by the driver after generation.
    pub valid: Option<bool>,
}

/// @ai:intent Performance metrics for one generation
///
/// ttft/tgt/gct/prft are in seconds, tpot in milliseconds. Fields stay `None`
/// when the back-end did not report the timestamps needed to derive them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerfMetrics {
    /// Time to first token.
    pub ttft: Option<f64>,
    /// Time per output token.
    pub tpot: Option<f64>,
    /// Total generation time.
    pub tgt: Option<f64>,
    /// Grammar compilation time.
    pub gct: Option<f64>,
    /// Prefill time (first token minus compilation end).
    pub prft: Option<f64>,
}

impl PerfMetrics {
    /// @ai:intent Derive metrics from the timestamps the engine recorded
    /// @ai:effects pure
    pub fn from_timestamps(
        grammar_compilation_end_time: Option<f64>,
        first_token_arrival_time: Option<f64>,
        total_time: f64,
        num_output_tokens: u64,
    ) -> Self {
        let ttft = first_token_arrival_time;
        let tpot = if num_output_tokens > 1 {
            safe_divide(
                safe_subtract(Some(total_time), first_token_arrival_time),
                Some((num_output_tokens - 1) as f64),
            )
        } else {
            None
        };
        let gct = grammar_compilation_end_time;
        let prft = safe_subtract(first_token_arrival_time, grammar_compilation_end_time);

        Self {
            ttft,
            tpot: tpot.map(|t| t * 1000.0),
            tgt: Some(total_time),
            gct,
            prft,
        }
    }
}

/// @ai:intent Divide, propagating None and guarding division by zero
/// @ai:effects pure
pub fn safe_divide(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) if b != 0.0 => Some(a / b),
        _ => None,
    }
}

/// @ai:intent Subtract, propagating None
/// @ai:effects pure
pub fn safe_subtract(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    }
}

/// @ai:intent The record of one generation attempt
///
/// Created by the driver with `generation: None`, populated in place by the
/// engine's back-end call, then read-only for evaluation and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub task: String,
    pub unique_id: String,
    pub messages: Vec<Message>,
    pub schema: Schema,
    pub generation: Option<String>,
    #[serde(default)]
    pub generated_tokens: Vec<Token>,
    #[serde(default)]
    pub token_usage: TokenUsage,
    #[serde(default)]
    pub perf_metrics: PerfMetrics,
    #[serde(default)]
    pub metadata: GenerationMetadata,
}

impl GenerationOutput {
    /// @ai:intent Create an empty record for one (task, schema) pair
    /// @ai:effects pure
    pub fn new(
        task: impl Into<String>,
        unique_id: impl Into<String>,
        messages: Vec<Message>,
        schema: Schema,
    ) -> Self {
        Self {
            task: task.into(),
            unique_id: unique_id.into(),
            messages,
            schema,
            generation: None,
            generated_tokens: Vec::new(),
            token_usage: TokenUsage::default(),
            perf_metrics: PerfMetrics::default(),
            metadata: GenerationMetadata::default(),
        }
    }
}
