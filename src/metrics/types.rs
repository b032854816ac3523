//! @ai:module:intent Result types for benchmark summaries
//! @ai:module:layer domain
//! @ai:module:public_api BenchResults, TaskSummary
//! @ai:module:stateless true

use crate::types::PerfMetrics;
use serde::{Deserialize, Serialize};

/// @ai:intent Scores and median timings for one task
///
/// Declared coverage is the fraction of schemas the engine claimed to
/// support (compile status OK); empirical coverage is the fraction whose
/// generation actually conformed; compliance is empirical over declared,
/// that is, how often a claim held up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task: String,
    pub total: usize,
    pub declared_coverage: Option<f64>,
    pub empirical_coverage: Option<f64>,
    pub compliance: Option<f64>,
    /// Median-of-run values; the per-record semantics of each field apply.
    pub perf: PerfMetrics,
    pub median_output_tokens: Option<f64>,
}

/// @ai:intent Complete results of one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResults {
    pub timestamp: String,
    pub engine: String,
    pub engine_config: serde_json::Value,
    pub summaries: Vec<TaskSummary>,
}
