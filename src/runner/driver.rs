//! @ai:module:intent Sequential benchmark loop: generate, validate, collect
//! @ai:module:layer application
//! @ai:module:public_api BenchDriver, RunData
//! @ai:module:stateless false

use crate::config::{BenchConfig, PathConfig, RunConfig};
use crate::dataset::{Dataset, Task};
use crate::engine::Engine;
use crate::evaluator::evaluate_record;
use crate::messages::few_shot_messages;
use crate::report::json_report;
use crate::types::{CompileStatus, CompileStatusCode, GenerationOutput, TokenUsage};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// @ai:intent Everything one run produced
pub struct RunData {
    /// Records per task, in task order.
    pub outputs: Vec<(Task, Vec<GenerationOutput>)>,
    pub total_usage: TokenUsage,
    /// Where raw outputs were persisted, when requested.
    pub saved_path: Option<PathBuf>,
}

/// @ai:intent Drives one engine across task splits, one schema at a time
///
/// Single-threaded by design: the engine exclusively owns its back-end handle
/// and the driver exclusively owns the accumulating result list. A failed
/// schema is recorded and the batch continues; only missing datasets (and
/// engine construction, which happens before the driver) abort a run.
pub struct BenchDriver {
    run: RunConfig,
    paths: PathConfig,
}

impl BenchDriver {
    /// @ai:effects pure
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            run: config.run.clone(),
            paths: config.paths.clone(),
        }
    }

    /// @ai:intent Run the benchmark, consuming the engine
    ///
    /// `close` is invoked exactly once, on normal completion and on early
    /// termination alike; a close failure is logged and never discards
    /// collected results.
    /// @ai:effects network, fs, time
    pub async fn run<E: Engine>(
        &self,
        mut engine: E,
        engine_config: serde_json::Value,
        tasks: &[Task],
    ) -> Result<RunData> {
        let result = self.run_inner(&mut engine, engine_config, tasks).await;

        if let Err(e) = engine.close() {
            tracing::warn!("engine close failed: {}", e);
        }

        result
    }

    async fn run_inner<E: Engine>(
        &self,
        engine: &mut E,
        engine_config: serde_json::Value,
        tasks: &[Task],
    ) -> Result<RunData> {
        let mut all_outputs = Vec::new();
        let mut total_usage = TokenUsage::default();

        for task in tasks {
            let dataset = Dataset::load(&self.paths.dataset_dir, *task)
                .with_context(|| format!("Failed to load task {}", task))?;

            let planned = self
                .run
                .limit
                .map(|l| l.min(dataset.len()))
                .unwrap_or(dataset.len());
            tracing::info!("{}: {} schemas", task, planned);

            let mut task_outputs = Vec::with_capacity(planned);

            for (index, record) in dataset.iter(self.run.limit).enumerate() {
                tracing::debug!("[{}/{}] {}: generating {}", index + 1, planned, task, record.unique_id);

                let mut output = self
                    .generate_one(engine, *task, &record.unique_id, &record.schema)
                    .await;

                evaluate_record(&mut output);
                total_usage.add(output.token_usage);
                task_outputs.push(output);
            }

            all_outputs.push((*task, task_outputs));
        }

        tracing::info!("run complete, {}", total_usage);

        let saved_path = if self.run.save_outputs {
            let path = self.persist(engine.name(), &engine_config, &all_outputs)?;
            tracing::info!("Outputs saved to {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(RunData {
            outputs: all_outputs,
            total_usage,
            saved_path,
        })
    }

    /// @ai:intent One schema through the lifecycle; always yields a record
    /// @ai:effects network, time
    async fn generate_one<E: Engine>(
        &self,
        engine: &mut E,
        task: Task,
        unique_id: &str,
        schema: &serde_json::Value,
    ) -> GenerationOutput {
        let messages = few_shot_messages(task, schema);

        let prompt_tokens: usize = messages
            .iter()
            .map(|m| engine.count_tokens(&m.content))
            .sum();

        if prompt_tokens > engine.max_context_length() {
            let mut output =
                GenerationOutput::new(task.as_str(), unique_id, messages, schema.clone());
            output.metadata.compile_status = CompileStatus::failed(
                CompileStatusCode::PromptTooLong,
                format!(
                    "prompt is {} tokens, context limit is {}",
                    prompt_tokens,
                    engine.max_context_length()
                ),
            );
            return output;
        }

        engine
            .generate(task, unique_id, messages, schema.clone())
            .await
    }

    /// @ai:intent Persist raw outputs under `<outputs_dir>/<engine>/<run-id>.jsonl`
    /// @ai:effects fs:write
    fn persist(
        &self,
        engine_name: &str,
        engine_config: &serde_json::Value,
        outputs: &[(Task, Vec<GenerationOutput>)],
    ) -> Result<PathBuf> {
        let dir = self.paths.outputs_dir.join(engine_name);
        std::fs::create_dir_all(&dir)?;

        let run_id = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let path = dir.join(format!("{}.jsonl", run_id));

        let flat: Vec<&GenerationOutput> =
            outputs.iter().flat_map(|(_, o)| o.iter()).collect();
        json_report::write_outputs(&path, engine_name, engine_config, &flat)?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use crate::engine::MockEngine;
    use std::io::Write;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn write_split(dir: &std::path::Path, task: Task, count: usize) {
        let path = dir.join(format!("{}.jsonl", task.as_str()));
        let mut file = std::fs::File::create(path).unwrap();
        for i in 0..count {
            writeln!(
                file,
                r#"{{"unique_id": "id-{}", "json_schema": "{{\"type\": \"object\", \"required\": [\"a\"], \"properties\": {{\"a\": {{\"type\": \"integer\"}}}}}}"}}"#,
                i
            )
            .unwrap();
        }
    }

    fn driver_config(temp: &TempDir, limit: Option<usize>, save_outputs: bool) -> BenchConfig {
        BenchConfig {
            run: RunConfig {
                limit,
                save_outputs,
            },
            paths: PathConfig {
                dataset_dir: temp.path().to_path_buf(),
                outputs_dir: temp.path().join("outputs"),
            },
            ..Default::default()
        }
    }

    fn mock(generation: &str) -> MockEngine {
        MockEngine::new(MockConfig {
            generation: generation.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_limit_produces_exactly_n_records() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::GithubEasy, 10);

        let driver = BenchDriver::new(&driver_config(&temp, Some(5), false));
        let data = driver
            .run(mock("{\"a\": 1}"), serde_json::json!({}), &[Task::GithubEasy])
            .await
            .unwrap();

        assert_eq!(data.outputs.len(), 1);
        assert_eq!(data.outputs[0].1.len(), 5);
    }

    #[tokio::test]
    async fn test_conforming_generation_passes_validation() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::Snowplow, 2);

        let driver = BenchDriver::new(&driver_config(&temp, None, false));
        let data = driver
            .run(mock("{\"a\": 1}"), serde_json::json!({}), &[Task::Snowplow])
            .await
            .unwrap();

        for output in &data.outputs[0].1 {
            assert_eq!(output.metadata.valid, Some(true));
        }
    }

    #[tokio::test]
    async fn test_nonconforming_generation_fails_validation() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::Snowplow, 1);

        let driver = BenchDriver::new(&driver_config(&temp, None, false));
        let data = driver
            .run(mock("{\"a\": \"x\"}"), serde_json::json!({}), &[Task::Snowplow])
            .await
            .unwrap();

        assert_eq!(data.outputs[0].1[0].metadata.valid, Some(false));
    }

    #[tokio::test]
    async fn test_backend_failure_is_recorded_not_fatal() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::Kubernetes, 3);

        let engine = MockEngine::new(MockConfig {
            fail: true,
            ..Default::default()
        })
        .unwrap();

        let driver = BenchDriver::new(&driver_config(&temp, None, false));
        let data = driver
            .run(engine, serde_json::json!({}), &[Task::Kubernetes])
            .await
            .unwrap();

        assert_eq!(data.outputs[0].1.len(), 3);
        for output in &data.outputs[0].1 {
            assert!(output.generation.is_none());
            assert_eq!(output.metadata.valid, None);
        }
    }

    #[tokio::test]
    async fn test_close_called_once_on_success() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::GithubEasy, 1);

        let engine = mock("{\"a\": 1}");
        let counter = engine.close_counter();

        let driver = BenchDriver::new(&driver_config(&temp, None, false));
        driver
            .run(engine, serde_json::json!({}), &[Task::GithubEasy])
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_called_once_on_early_termination() {
        let temp = TempDir::new().unwrap();
        // no dataset file: the run fails before any generation

        let engine = mock("{}");
        let counter = engine.close_counter();

        let driver = BenchDriver::new(&driver_config(&temp, None, false));
        let result = driver
            .run(engine, serde_json::json!({}), &[Task::WashingtonPost])
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_failure_does_not_discard_results() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::GithubEasy, 2);

        let engine = mock("{\"a\": 1}").with_failing_close();

        let driver = BenchDriver::new(&driver_config(&temp, None, false));
        let data = driver
            .run(engine, serde_json::json!({}), &[Task::GithubEasy])
            .await
            .unwrap();

        assert_eq!(data.outputs[0].1.len(), 2);
    }

    #[tokio::test]
    async fn test_oversized_prompt_is_skipped_with_record() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::GithubEasy, 1);

        let engine = MockEngine::new(MockConfig {
            max_context_length: 1,
            ..Default::default()
        })
        .unwrap();

        let driver = BenchDriver::new(&driver_config(&temp, None, false));
        let data = driver
            .run(engine, serde_json::json!({}), &[Task::GithubEasy])
            .await
            .unwrap();

        let output = &data.outputs[0].1[0];
        assert!(output.generation.is_none());
        assert_eq!(
            output.metadata.compile_status.code,
            CompileStatusCode::PromptTooLong
        );
    }

    #[tokio::test]
    async fn test_validation_verdicts_are_idempotent() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::Glaiveai2K, 4);

        let config = driver_config(&temp, None, false);
        let driver = BenchDriver::new(&config);

        let first = driver
            .run(mock("{\"a\": 1}"), serde_json::json!({}), &[Task::Glaiveai2K])
            .await
            .unwrap();
        let second = driver
            .run(mock("{\"a\": 1}"), serde_json::json!({}), &[Task::Glaiveai2K])
            .await
            .unwrap();

        let verdicts = |data: &RunData| -> Vec<Option<bool>> {
            data.outputs[0].1.iter().map(|o| o.metadata.valid).collect()
        };
        assert_eq!(verdicts(&first), verdicts(&second));
    }

    #[tokio::test]
    async fn test_save_outputs_writes_jsonl() {
        let temp = TempDir::new().unwrap();
        write_split(temp.path(), Task::GithubEasy, 2);

        let driver = BenchDriver::new(&driver_config(&temp, None, true));
        let data = driver
            .run(
                mock("{\"a\": 1}"),
                serde_json::json!({"generation": "{\"a\": 1}"}),
                &[Task::GithubEasy],
            )
            .await
            .unwrap();

        let path = data.saved_path.unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        // header line plus one line per record
        assert_eq!(content.lines().count(), 3);
    }
}
