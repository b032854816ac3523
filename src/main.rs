//! @ai:module:intent CLI for the JSON Schema generation benchmark
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use schemabench::{
    config::BenchConfig,
    dataset::{self, Task},
    engine::{Engine, EngineKind, MockEngine, OpenAiEngine},
    evaluator,
    metrics::{summarize_task, BenchResults, TaskSummary},
    report::{json_report, ReportGenerator},
    runner::BenchDriver,
    types::GenerationOutput,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schemabench")]
#[command(about = "Benchmark for JSON Schema constrained generation engines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark
    Run {
        /// Engine to benchmark (openai, mock)
        #[arg(short, long)]
        engine: String,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Tasks to run (comma-separated); defaults to every split
        #[arg(short, long)]
        tasks: Option<String>,

        /// Cap on schemas per task
        #[arg(short, long)]
        limit: Option<usize>,

        /// Persist raw generation outputs as JSONL
        #[arg(long)]
        save_outputs: bool,

        /// Output directory for reports
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Recompute scores from a saved raw-outputs file
    Analyze {
        /// Path to a raw-outputs JSONL file
        #[arg(short, long)]
        outputs: PathBuf,

        /// Print per-record status lines
        #[arg(long)]
        details: bool,

        /// Also write results.json and charts to this directory
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List tasks and which splits are present locally
    List {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "schemabench.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("schemabench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            engine,
            config,
            tasks,
            limit,
            save_outputs,
            output,
        } => {
            run_benchmark(RunArgs {
                engine,
                config,
                tasks,
                limit,
                save_outputs,
                output,
            })
            .await
        }
        Commands::Analyze {
            outputs,
            details,
            report,
        } => analyze_outputs(outputs, details, report),
        Commands::List { config } => list_tasks(config),
        Commands::Init { output } => init_config(output),
    }
}

struct RunArgs {
    engine: String,
    config: Option<PathBuf>,
    tasks: Option<String>,
    limit: Option<usize>,
    save_outputs: bool,
    output: PathBuf,
}

/// @ai:intent Run the benchmark suite end to end
/// @ai:effects network, fs:write
async fn run_benchmark(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if args.limit.is_some() {
        config.run.limit = args.limit;
    }
    if args.save_outputs {
        config.run.save_outputs = true;
    }

    let kind: EngineKind = args
        .engine
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let tasks = parse_tasks(args.tasks)?;

    tracing::info!(
        "Benchmarking engine {} on {} tasks (dataset dir {})",
        kind,
        tasks.len(),
        config.paths.dataset_dir.display()
    );

    let driver = BenchDriver::new(&config);

    // Engine construction failures are fatal; generation failures are not.
    let summaries = match kind {
        EngineKind::OpenAi => {
            let engine = OpenAiEngine::new(config.openai.clone())?;
            let engine_config = serde_json::to_value(&config.openai)?;
            run_and_summarize(&driver, engine, engine_config, &tasks).await?
        }
        EngineKind::Mock => {
            let engine = MockEngine::new(config.mock.clone())?;
            let engine_config = serde_json::to_value(&config.mock)?;
            run_and_summarize(&driver, engine, engine_config, &tasks).await?
        }
    };

    let results = BenchResults {
        timestamp: chrono::Utc::now().to_rfc3339(),
        engine: kind.as_str().to_string(),
        engine_config: match kind {
            EngineKind::OpenAi => serde_json::to_value(&config.openai)?,
            EngineKind::Mock => serde_json::to_value(&config.mock)?,
        },
        summaries,
    };

    let run_dir = args
        .output
        .join(chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string());
    let reporter = ReportGenerator::new();
    reporter.generate_all(&results, &run_dir)?;

    print_score_table(&results.summaries);

    Ok(())
}

/// @ai:intent Drive one engine and summarize its outputs per task
/// @ai:effects network, fs:write
async fn run_and_summarize<E: Engine>(
    driver: &BenchDriver,
    engine: E,
    engine_config: serde_json::Value,
    tasks: &[Task],
) -> Result<Vec<TaskSummary>> {
    let data = driver.run(engine, engine_config, tasks).await?;

    Ok(data
        .outputs
        .iter()
        .map(|(task, outputs)| summarize_task(task.as_str(), outputs))
        .collect())
}

/// @ai:intent Recompute scores from persisted outputs
/// @ai:effects fs:read, fs:write
fn analyze_outputs(path: PathBuf, details: bool, report: Option<PathBuf>) -> Result<()> {
    let (header, mut outputs) = json_report::read_outputs(&path)?;

    // Verdicts are recomputed from the generations, not trusted from the file.
    evaluator::evaluate_records(&mut outputs);

    println!("Engine: {}", header.engine);
    println!("Records: {}", outputs.len());

    if details {
        for output in &outputs {
            println!(
                "  {:<35} compile={:<20} valid={}",
                output.unique_id,
                format!("{:?}", output.metadata.compile_status.code),
                output
                    .metadata
                    .valid
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "n/a".to_string())
            );
        }
    }

    let summaries = group_and_summarize(&outputs);
    print_score_table(&summaries);

    if let Some(report_dir) = report {
        let results = BenchResults {
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine: header.engine,
            engine_config: header.engine_config,
            summaries,
        };
        ReportGenerator::new().generate_all(&results, &report_dir)?;
    }

    Ok(())
}

/// @ai:intent Group records by task, preserving first-seen order
/// @ai:effects pure
fn group_and_summarize(outputs: &[GenerationOutput]) -> Vec<TaskSummary> {
    let mut order: Vec<&str> = Vec::new();
    for output in outputs {
        if !order.contains(&output.task.as_str()) {
            order.push(&output.task);
        }
    }

    order
        .into_iter()
        .map(|task| {
            let records: Vec<GenerationOutput> = outputs
                .iter()
                .filter(|o| o.task == task)
                .cloned()
                .collect();
            summarize_task(task, &records)
        })
        .collect()
}

/// @ai:intent List tasks, marking splits present in the dataset directory
/// @ai:effects fs:read, io
fn list_tasks(config: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config)?;
    let splits = dataset::loader::available_splits(&config.paths.dataset_dir);

    println!("Available tasks ({}):", dataset::task::ALL_TASKS.len());
    println!();
    println!("{:<18} {:<10}", "Task", "Split");
    println!("{}", "-".repeat(30));

    for task in dataset::task::ALL_TASKS {
        let file_name = format!("{}.jsonl", task.as_str());
        let present = splits
            .iter()
            .any(|p| p.file_name().and_then(|n| n.to_str()) == Some(file_name.as_str()));
        println!(
            "{:<18} {:<10}",
            task,
            if present { "present" } else { "missing" }
        );
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchConfig> {
    match path {
        Some(p) => BenchConfig::load(&p),
        None => {
            let default_path = PathBuf::from("schemabench.toml");

            if default_path.exists() {
                BenchConfig::load(&default_path)
            } else {
                Ok(BenchConfig::default())
            }
        }
    }
}

/// @ai:intent Parse a comma-separated task list; None means every split
/// @ai:effects pure
fn parse_tasks(tasks: Option<String>) -> Result<Vec<Task>> {
    match tasks {
        Some(s) => s
            .split(',')
            .map(|t| t.trim().parse::<Task>().map_err(|e| anyhow::anyhow!(e)))
            .collect(),
        None => Ok(dataset::task::ALL_TASKS
            .iter()
            .copied()
            .filter(|t| *t != Task::Default)
            .collect()),
    }
}

/// @ai:intent Print score table to console
/// @ai:effects io
fn print_score_table(summaries: &[TaskSummary]) {
    println!();
    println!("Benchmark Results");
    println!("=================");
    println!();
    println!(
        "{:<18} {:>6} {:>10} {:>10} {:>11} {:>9} {:>10} {:>8} {:>8}",
        "Task", "Total", "Declared", "Empirical", "Compliance", "TTFT (s)", "TPOT (ms)", "TGT (s)", "GCT (s)"
    );
    println!("{}", "-".repeat(96));

    for s in summaries {
        println!(
            "{:<18} {:>6} {:>10} {:>10} {:>11} {:>9} {:>10} {:>8} {:>8}",
            s.task,
            s.total,
            fmt_pct(s.declared_coverage),
            fmt_pct(s.empirical_coverage),
            fmt_pct(s.compliance),
            fmt_opt(s.perf.ttft, 3),
            fmt_opt(s.perf.tpot, 1),
            fmt_opt(s.perf.tgt, 2),
            fmt_opt(s.perf.gct, 2),
        );
    }

    println!();
}

/// @ai:effects pure
fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

/// @ai:effects pure
fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}
