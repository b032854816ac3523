//! @ai:module:intent Statistical aggregation of generation records
//! @ai:module:layer application
//! @ai:module:public_api summarize_task, median
//! @ai:module:stateless true

use crate::metrics::types::TaskSummary;
use crate::types::{safe_divide, CompileStatusCode, GenerationOutput, PerfMetrics};

/// @ai:intent Median of a sample; None when empty
/// @ai:effects pure
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// @ai:intent Collect the present values of one perf field across records
/// @ai:effects pure
fn collect<F>(outputs: &[GenerationOutput], field: F) -> Vec<f64>
where
    F: Fn(&PerfMetrics) -> Option<f64>,
{
    outputs
        .iter()
        .filter_map(|o| field(&o.perf_metrics))
        .collect()
}

/// @ai:intent Summarize one task's records into coverage and median timings
/// @ai:effects pure
pub fn summarize_task(task: &str, outputs: &[GenerationOutput]) -> TaskSummary {
    let total = outputs.len();

    let declared = outputs
        .iter()
        .filter(|o| o.metadata.compile_status.code == CompileStatusCode::Ok)
        .count();

    let empirical = outputs
        .iter()
        .filter(|o| o.metadata.valid == Some(true))
        .count();

    let output_tokens: Vec<f64> = outputs
        .iter()
        .filter(|o| o.generation.is_some())
        .map(|o| o.token_usage.output_tokens as f64)
        .collect();

    TaskSummary {
        task: task.to_string(),
        total,
        declared_coverage: safe_divide(Some(declared as f64), Some(total as f64)),
        empirical_coverage: safe_divide(Some(empirical as f64), Some(total as f64)),
        compliance: safe_divide(Some(empirical as f64), Some(declared as f64)),
        perf: PerfMetrics {
            ttft: median(&collect(outputs, |p| p.ttft)),
            tpot: median(&collect(outputs, |p| p.tpot)),
            tgt: median(&collect(outputs, |p| p.tgt)),
            gct: median(&collect(outputs, |p| p.gct)),
            prft: median(&collect(outputs, |p| p.prft)),
        },
        median_output_tokens: median(&output_tokens),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompileStatus, TokenUsage};

    fn record(compile_ok: bool, valid: Option<bool>, tgt: f64) -> GenerationOutput {
        let mut output = GenerationOutput::new(
            "Github_easy",
            format!("gh-{}", tgt),
            vec![],
            serde_json::json!({"type": "object"}),
        );
        if compile_ok {
            output.metadata.compile_status = CompileStatus::ok();
            output.generation = Some("{}".to_string());
            output.token_usage = TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            };
        }
        output.metadata.valid = valid;
        output.perf_metrics.tgt = Some(tgt);
        output
    }

    #[test]
    fn test_median_odd_even_empty() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_coverage_and_compliance() {
        let outputs = vec![
            record(true, Some(true), 1.0),
            record(true, Some(false), 2.0),
            record(false, None, 3.0),
            record(true, Some(true), 4.0),
        ];

        let summary = summarize_task("Github_easy", &outputs);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.declared_coverage, Some(0.75));
        assert_eq!(summary.empirical_coverage, Some(0.5));
        // 2 valid out of 3 declared
        assert!((summary.compliance.unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.perf.tgt, Some(2.5));
    }

    #[test]
    fn test_empty_task_yields_none_scores() {
        let summary = summarize_task("Snowplow", &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.declared_coverage, None);
        assert_eq!(summary.compliance, None);
        assert_eq!(summary.perf.tgt, None);
    }

    #[test]
    fn test_compliance_none_when_nothing_declared() {
        let outputs = vec![record(false, None, 1.0)];
        let summary = summarize_task("Kubernetes", &outputs);
        assert_eq!(summary.declared_coverage, Some(0.0));
        // division by zero declared propagates to None
        assert_eq!(summary.compliance, None);
    }
}
