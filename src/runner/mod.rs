//! @ai:module:intent Benchmark driver over engines and task splits
//! @ai:module:layer application
//! @ai:module:public_api BenchDriver, RunData

pub mod driver;

pub use driver::{BenchDriver, RunData};
