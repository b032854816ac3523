//! @ai:module:intent Report generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, ChartGenerator

pub mod charts;
pub mod json_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait, RunHeader};

use crate::metrics::BenchResults;
use anyhow::Result;
use std::path::Path;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Generate all reports
    /// @ai:effects fs:write
    pub fn generate_all(&self, results: &BenchResults, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json
            .generate(results, &output_dir.join("results.json"))?;
        self.charts.generate_all(results, output_dir)?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TaskSummary;
    use crate::types::PerfMetrics;
    use tempfile::TempDir;

    #[test]
    fn test_generate_all_reports() {
        let generator = ReportGenerator::new();
        let temp = TempDir::new().unwrap();

        let results = BenchResults {
            timestamp: "2026-08-30T00:00:00Z".to_string(),
            engine: "mock".to_string(),
            engine_config: serde_json::json!({}),
            summaries: vec![TaskSummary {
                task: "Github_easy".to_string(),
                total: 3,
                declared_coverage: Some(1.0),
                empirical_coverage: Some(1.0),
                compliance: Some(1.0),
                perf: PerfMetrics::default(),
                median_output_tokens: Some(5.0),
            }],
        };

        generator.generate_all(&results, temp.path()).unwrap();

        assert!(temp.path().join("results.json").exists());
        assert!(temp.path().join("coverage.png").exists());
    }
}
