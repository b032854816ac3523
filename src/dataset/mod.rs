//! @ai:module:intent Benchmark dataset splits and loading
//! @ai:module:layer domain
//! @ai:module:public_api Task, Dataset, SchemaRecord

pub mod loader;
pub mod task;

pub use loader::{Dataset, SchemaRecord};
pub use task::Task;
