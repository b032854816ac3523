//! @ai:module:intent Chart generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::BenchResults;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from results
    fn generate_all(&self, results: &BenchResults, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates charts from benchmark results
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Bar chart of coverage per task, declared next to empirical
    /// @ai:effects fs:write
    fn generate_coverage_chart(&self, results: &BenchResults, output_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let data: Vec<_> = results
            .summaries
            .iter()
            .map(|s| {
                (
                    s.task.as_str(),
                    s.declared_coverage.unwrap_or(0.0) * 100.0,
                    s.empirical_coverage.unwrap_or(0.0) * 100.0,
                )
            })
            .collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Coverage by Task ({})", results.engine),
                ("sans-serif", 30),
            )
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..data.len().max(1) as i32, 0f64..100f64)?;

        chart
            .configure_mesh()
            .y_desc("Coverage (%)")
            .x_desc("Task")
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _, _)| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart
            .draw_series(data.iter().enumerate().map(|(i, (_, declared, _))| {
                Rectangle::new([(i as i32, 0.0), (i as i32, *declared)], BLUE.mix(0.7).filled())
            }))?
            .label("Declared")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.mix(0.7).filled())
            });

        chart
            .draw_series(data.iter().enumerate().map(|(i, (_, _, empirical))| {
                Rectangle::new(
                    [(i as i32, 0.0), (i as i32, *empirical)],
                    GREEN.mix(0.7).filled(),
                )
            }))?
            .label("Empirical")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], GREEN.mix(0.7).filled())
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Bar chart of median generation time per task
    /// @ai:effects fs:write
    fn generate_latency_chart(&self, results: &BenchResults, output_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(output_path, (900, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let data: Vec<_> = results
            .summaries
            .iter()
            .map(|s| (s.task.as_str(), s.perf.tgt.unwrap_or(0.0)))
            .collect();

        let max_tgt = data
            .iter()
            .map(|(_, t)| *t)
            .fold(0.0f64, f64::max)
            .max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Median Generation Time by Task ({})", results.engine),
                ("sans-serif", 25),
            )
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..data.len().max(1) as i32, 0f64..max_tgt * 1.1)?;

        chart
            .configure_mesh()
            .y_desc("Median TGT (s)")
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(data.iter().enumerate().map(|(i, (_, tgt))| {
            Rectangle::new([(i as i32, 0.0), (i as i32, *tgt)], BLUE.mix(0.7).filled())
        }))?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:effects fs:write
    fn generate_all(&self, results: &BenchResults, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        let coverage_path = output_dir.join("coverage.png");
        self.generate_coverage_chart(results, &coverage_path)?;
        generated.push("coverage.png".to_string());

        let latency_path = output_dir.join("latency.png");
        self.generate_latency_chart(results, &latency_path)?;
        generated.push("latency.png".to_string());

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TaskSummary;
    use crate::types::PerfMetrics;
    use tempfile::TempDir;

    fn create_test_results() -> BenchResults {
        BenchResults {
            timestamp: "2026-08-30T00:00:00Z".to_string(),
            engine: "mock".to_string(),
            engine_config: serde_json::json!({}),
            summaries: vec![
                TaskSummary {
                    task: "Snowplow".to_string(),
                    total: 10,
                    declared_coverage: Some(1.0),
                    empirical_coverage: Some(0.9),
                    compliance: Some(0.9),
                    perf: PerfMetrics {
                        tgt: Some(1.2),
                        ..Default::default()
                    },
                    median_output_tokens: Some(40.0),
                },
                TaskSummary {
                    task: "Kubernetes".to_string(),
                    total: 10,
                    declared_coverage: Some(0.8),
                    empirical_coverage: Some(0.6),
                    compliance: Some(0.75),
                    perf: PerfMetrics {
                        tgt: Some(2.5),
                        ..Default::default()
                    },
                    median_output_tokens: Some(80.0),
                },
            ],
        }
    }

    #[test]
    fn test_generate_all_charts() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let results = create_test_results();

        let files = generator.generate_all(&results, temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(temp.path().join("coverage.png").exists());
        assert!(temp.path().join("latency.png").exists());
    }
}
