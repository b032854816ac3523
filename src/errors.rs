//! @ai:module:intent Error types for the benchmark harness
//! @ai:module:layer domain
//! @ai:module:public_api BenchError
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Error kinds surfaced by the benchmark harness
///
/// Only `Config` is fatal for a run: it is raised before any generation
/// starts. Generation and validation failures are captured per record by the
/// driver; `Resource` failures on close are logged and never discard
/// already-collected results.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid engine configuration: {0}")]
    Config(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("schema validation failed: {0}")]
    Validation(String),

    #[error("resource release failed: {0}")]
    Resource(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// @ai:intent Result alias for harness operations
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = BenchError::Config("model must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid engine configuration: model must not be empty"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BenchError = io.into();
        assert!(matches!(err, BenchError::Io(_)));
    }
}
