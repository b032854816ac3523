//! @ai:module:intent JSON results report and JSONL raw-output persistence
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, write_outputs, read_outputs
//! @ai:module:stateless true

use crate::metrics::BenchResults;
use crate::types::GenerationOutput;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from results
    fn generate(&self, results: &BenchResults, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates JSON reports from benchmark results
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects fs:write
    fn generate(&self, results: &BenchResults, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

/// @ai:intent First line of a raw-outputs file: which engine produced it, how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunHeader {
    pub engine: String,
    pub engine_config: serde_json::Value,
}

/// @ai:intent Write raw outputs as JSONL: one header line, then one record per line
/// @ai:effects fs:write
pub fn write_outputs(
    path: &Path,
    engine: &str,
    engine_config: &serde_json::Value,
    outputs: &[&GenerationOutput],
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let header = RunHeader {
        engine: engine.to_string(),
        engine_config: engine_config.clone(),
    };
    serde_json::to_writer(&mut writer, &header)?;
    writer.write_all(b"\n")?;

    for output in outputs {
        serde_json::to_writer(&mut writer, output)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// @ai:intent Read a raw-outputs JSONL file back into records
/// @ai:effects fs:read
pub fn read_outputs(path: &Path) -> Result<(RunHeader, Vec<GenerationOutput>)> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let header_line = lines
        .next()
        .context("outputs file is empty")??;
    let header: RunHeader = serde_json::from_str(&header_line)
        .context("first line is not a run header")?;

    let mut outputs = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        outputs.push(serde_json::from_str(&line)?);
    }

    Ok((header, outputs))
}
