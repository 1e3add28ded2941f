//! CLI entry point for the session analysis toolkit.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use session_insights::reporting::{AnalysisReport, ReportGenerator};
use session_insights::source::{self, CsvSource, DataSource};
use session_insights::{CleaningConfig, Dataset, DatasetProfiler, ImputationStrategy, Pipeline};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliImputation {
    /// Use the median of non-missing values
    Median,
    /// Use the mean of non-missing values
    Mean,
}

impl From<CliImputation> for ImputationStrategy {
    fn from(cli: CliImputation) -> Self {
        match cli {
            CliImputation::Median => ImputationStrategy::Median,
            CliImputation::Mean => ImputationStrategy::Mean,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "E-commerce session cleaning and business metrics",
    long_about = "Cleans a table of e-commerce sessions and reports grouped business metrics.\n\n\
                  EXAMPLES:\n  \
                  # Analyze a single CSV file\n  \
                  session-insights -i sessions.csv\n\n  \
                  # Read the 'sessions' table from a directory of CSV tables\n  \
                  session-insights --data-dir data/ --table sessions\n\n  \
                  # Remove bounce-rate outliers and save the cleaned data\n  \
                  session-insights -i sessions.csv --outlier-columns bounce_rates -o out.csv\n\n  \
                  # Machine-readable output\n  \
                  session-insights -i sessions.csv --json | jq .metrics.regional_revenue"
)]
struct Args {
    /// Path to a CSV file of sessions
    #[arg(short, long, conflicts_with = "data_dir")]
    input: Option<String>,

    /// Directory holding one CSV file per table
    #[arg(long)]
    data_dir: Option<String>,

    /// Table to read from --data-dir
    #[arg(long, default_value = "sessions")]
    table: String,

    /// JSON file with a cleaning configuration
    ///
    /// When given, it replaces --strategy, --skew-threshold and --outlier-columns
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strategy for imputing missing numeric values
    #[arg(long, value_enum, default_value = "median")]
    strategy: CliImputation,

    /// Absolute skewness above which a numeric column is log-transformed
    #[arg(long, default_value = "0.5")]
    skew_threshold: f64,

    /// Numeric columns checked for IQR outliers, in order
    #[arg(long, value_delimiter = ',')]
    outlier_columns: Vec<String>,

    /// Write the cleaned dataset to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the JSON report written by --emit-report
    #[arg(long, default_value = "./outputs")]
    report_dir: PathBuf,

    /// Only profile the raw dataset, without cleaning it
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the report directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let (input_name, mut dataset) = load_dataset(&args)?;
    info!("Dataset loaded successfully: {:?}", dataset.shape());

    if args.dry_run {
        return run_dry_run(&input_name, &dataset, args.json);
    }

    let config = build_config(&args)?;
    debug!("Cleaning config: {:?}", config);

    let summary = Pipeline::builder()
        .config(config)
        .build()?
        .process(&mut dataset)?;

    if let Some(ref output) = args.output {
        source::persist(&dataset, output)?;
    }

    let output_file = args.output.as_ref().map(|p| p.display().to_string());
    let report =
        ReportGenerator::build_report(&input_name, output_file.as_deref(), &summary, &dataset)?;

    if args.emit_report {
        let generator = ReportGenerator::new(args.report_dir.clone());
        let base_name = Path::new(&input_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sessions");
        generator.write_report_to_file(&report, base_name)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, args.emit_report);
    }

    Ok(())
}

/// Load the raw sessions from a file or a table directory.
fn load_dataset(args: &Args) -> Result<(String, Dataset)> {
    match (&args.input, &args.data_dir) {
        (Some(input), _) => {
            info!("Loading dataset from: {}", input);
            Ok((input.clone(), source::load(input)?))
        }
        (None, Some(dir)) => {
            let source = CsvSource::new(dir);
            info!("Extracting table '{}' from: {}", args.table, dir);
            Ok((args.table.clone(), source.extract(&args.table)?))
        }
        (None, None) => Err(anyhow!("Either --input or --data-dir is required")),
    }
}

/// Build the cleaning configuration from a JSON file or from flags.
fn build_config(args: &Args) -> Result<CleaningConfig> {
    if let Some(ref path) = args.config {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CleaningConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        return Ok(config);
    }

    Ok(CleaningConfig::builder()
        .imputation(args.strategy.into())
        .skew_threshold(args.skew_threshold)
        .outlier_columns(args.outlier_columns.iter().map(|c| c.trim().to_string()))
        .build()?)
}

/// Profile the raw dataset without cleaning it.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn run_dry_run(input_name: &str, dataset: &Dataset, json_output: bool) -> Result<()> {
    let profile = DatasetProfiler::profile(dataset)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Profile of the raw dataset");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  Source: {}", input_name);
    println!("  Rows: {}", profile.shape.0);
    println!("  Columns: {}", profile.shape.1);
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    println!("{:<24} {:<20} {:<10}", "Column", "Kind", "Missing");
    println!("{}", "-".repeat(56));
    for (column, nulls) in profile.columns.iter().zip(&profile.null_counts) {
        println!(
            "{:<24} {:<20} {:<10}",
            truncate_str(&column.name, 23),
            column.kind.to_string(),
            nulls.nulls
        );
    }
    println!();

    println!("NUMERIC STATISTICS");
    println!("{}", "-".repeat(40));
    println!(
        "{:<24} {:>8} {:>12} {:>12} {:>12} {:>12}",
        "Column", "Count", "Mean", "Std", "Min", "Max"
    );
    for stats in &profile.statistics {
        println!(
            "{:<24} {:>8} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
            truncate_str(&stats.name, 23),
            stats.count,
            stats.mean,
            stats.std,
            stats.min,
            stats.max
        );
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Print a human-readable summary of the analysis.
fn print_summary(report: &AnalysisReport, report_written: bool) {
    let summary = &report.cleaning;
    let metrics = &report.metrics;

    println!("\n{}", "=".repeat(80));
    println!("SESSION ANALYSIS COMPLETE");
    println!("{}\n", "=".repeat(80));

    println!("Source: {}", report.input);
    if let Some(ref output) = report.output_file {
        println!("Cleaned data: {}", output);
    }
    println!();

    println!("Cleaning:");
    println!(
        "  Rows: {} -> {} ({} removed)",
        summary.rows_before, summary.rows_after, summary.rows_removed
    );
    if !summary.imputed_columns.is_empty() {
        println!("  Imputed: {}", summary.imputed_columns.join(", "));
    }
    if !summary.skew_corrected_columns.is_empty() {
        println!("  Log-transformed: {}", summary.skew_corrected_columns.join(", "));
    }
    println!("  Duration: {}ms", summary.duration_ms);
    println!();

    println!("Weekend sales (mean revenue):");
    for entry in metrics.weekend_sales.iter() {
        println!("  {:<20} {:>10.4}", entry.key.to_string(), entry.value);
    }
    println!();

    println!("Regional revenue:");
    for entry in metrics.regional_revenue.iter().take(10) {
        println!("  {:<20} {:>10.2}", entry.key.to_string(), entry.value);
    }
    if metrics.regional_revenue.len() > 10 {
        println!("  ... and {} more regions", metrics.regional_revenue.len() - 10);
    }
    println!();

    println!("Traffic sources:");
    println!("  {:<20} {:>10} {:>12}", "Type", "Revenue", "Bounce rate");
    for entry in metrics.traffic.iter().take(10) {
        println!(
            "  {:<20} {:>10.2} {:>12.4}",
            entry.key.to_string(),
            entry.value.revenue,
            entry.value.bounce_rates
        );
    }
    if metrics.traffic.len() > 10 {
        println!("  ... and {} more traffic types", metrics.traffic.len() - 10);
    }
    println!();

    if let Some(ref devices) = metrics.device_breakdown {
        println!("Devices:");
        for entry in devices.iter() {
            println!("  {:<20} {:>10}", entry.key.to_string(), entry.value);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    if !report_written {
        println!("Use --emit-report to save detailed JSON report");
    }
    println!("{}", "=".repeat(80));
}

/// Truncate a string to a maximum number of characters.
fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
