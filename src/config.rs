//! @ai:module:intent Configuration structs for the benchmark harness
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchConfig, RunConfig, PathConfig, OpenAiConfig, MockConfig
//! @ai:module:stateless true

use crate::errors::BenchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for the benchmark harness
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// @ai:intent Run parameters for one benchmark invocation
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Cap on the number of schemas per task; None runs the whole split.
    pub limit: Option<usize>,
    #[serde(default)]
    pub save_outputs: bool,
}

/// @ai:intent Input/output directories
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub dataset_dir: PathBuf,
    pub outputs_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("datasets"),
            outputs_dir: PathBuf::from("outputs"),
        }
    }
}

/// @ai:intent Parameters for the OpenAI-compatible HTTP engine
///
/// Immutable once validated; owned by exactly one engine instance.
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for OpenAI-compatible providers; None targets api.openai.com.
    pub base_url: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
            max_tokens: None,
            temperature: 0.0,
            requests_per_minute: default_rate_limit(),
        }
    }
}

impl OpenAiConfig {
    /// @ai:intent Reject missing or out-of-range parameters before any generation
    /// @ai:effects pure
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.model.trim().is_empty() {
            return Err(BenchError::Config("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(BenchError::Config(format!(
                "temperature {} out of range [0, 2]",
                self.temperature
            )));
        }

        if self.max_tokens == Some(0) {
            return Err(BenchError::Config("max_tokens must be positive".to_string()));
        }

        if self.requests_per_minute == 0 {
            return Err(BenchError::Config(
                "requests_per_minute must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// @ai:intent Parameters for the deterministic stub engine
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Canned generation returned for every schema.
    #[serde(default = "default_mock_generation")]
    pub generation: String,
    /// When set, every generation records a back-end failure instead.
    #[serde(default)]
    pub fail: bool,
    #[serde(default = "default_mock_context")]
    pub max_context_length: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            generation: default_mock_generation(),
            fail: false,
            max_context_length: default_mock_context(),
        }
    }
}

impl MockConfig {
    /// @ai:effects pure
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.max_context_length == 0 {
            return Err(BenchError::Config(
                "max_context_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_rate_limit() -> u32 {
    60
}

fn default_mock_generation() -> String {
    "{}".to_string()
}

fn default_mock_context() -> usize {
    4096
}

impl BenchConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
