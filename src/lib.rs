//! @ai:module:intent JSON Schema constrained-generation benchmark library
//! @ai:module:layer application
//! @ai:module:public_api config, dataset, engine, evaluator, messages, metrics, report, runner, types

pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod evaluator;
pub mod messages;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod types;

pub use config::BenchConfig;
pub use dataset::{Dataset, Task};
pub use engine::{Engine, EngineKind, MockEngine, OpenAiEngine};
pub use errors::{BenchError, BenchResult};
pub use metrics::{BenchResults, TaskSummary};
pub use report::ReportGenerator;
pub use runner::{BenchDriver, RunData};
pub use types::{GenerationOutput, PerfMetrics, TokenUsage};
