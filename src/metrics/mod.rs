//! @ai:module:intent Metric aggregation over generation records
//! @ai:module:layer application
//! @ai:module:public_api BenchResults, TaskSummary, summarize_task

pub mod aggregator;
pub mod types;

pub use aggregator::{median, summarize_task};
pub use types::{BenchResults, TaskSummary};
