//! Batch processing command for multiple Form 16 files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use form16_core::{DeductionEngine, Form16Config, Form16Parser, FormData, TaxCalculator};

use super::process::extract_file;
use super::report::{OutputFormat, TaxReport};
use super::{collect_deductions, load_config, suggestion_rng, LayoutArg};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Skip template detection and use this layout for every file
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Deduction inputs applied to every file, as KEY=VALUE (repeatable)
    #[arg(short, long = "deduction")]
    deductions: Vec<String>,

    /// Deduction inputs as a JSON object, inline or a file path
    #[arg(long = "deductions")]
    deductions_json: Option<String>,

    /// Seed for suggestion sampling, reused for every file
    #[arg(long)]
    seed: Option<u64>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<TaxReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// Shared, read-only state for the workers.
struct Job {
    config: Form16Config,
    parser: Form16Parser,
    engine: DeductionEngine,
    inputs: FormData,
    seed: Option<u64>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut parser = Form16Parser::from_config(&config.extraction);
    if let Some(layout) = args.layout {
        parser = parser.with_layout(Some(layout.into()));
    }
    let job = Arc::new(Job {
        engine: DeductionEngine::with_calculator(TaxCalculator::from_config(&config.suggestions)),
        inputs: collect_deductions(args.deductions_json.as_deref(), &args.deductions)?,
        parser,
        seed: args.seed,
        config,
    });

    let mut pending = stream::iter(files)
        .map(|path| {
            let job = Arc::clone(&job);
            tokio::task::spawn_blocking(move || {
                let file_start = Instant::now();
                let result = process_single_file(&path, &job);
                (path, result, file_start.elapsed().as_millis() as u64)
            })
        })
        .buffer_unordered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(joined) = pending.next().await {
        let (path, result, processing_time_ms) = joined?;

        match result {
            Ok(report) => {
                results.push(ProcessResult {
                    path,
                    report: Some(report),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        report: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");
    results.sort_by(|a, b| a.path.cmp(&b.path));

    // Write outputs
    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        if let (Some(report), Some(output_dir)) = (&result.report, &args.output_dir) {
            let output_name = result.path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("form16");

            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, extension));
            let content = report.render(args.format, &job.config.report)?;

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, job: &Job) -> anyhow::Result<TaxReport> {
    let extraction = extract_file(path, &job.parser, &job.config.pdf)?;
    if extraction.is_soft_failure() {
        anyhow::bail!("No Form 16 fields found");
    }

    let mut rng = suggestion_rng(job.seed, &job.config);
    let comparison = job.engine.compare(&job.inputs, &extraction.record, &mut rng);

    Ok(TaxReport::new(
        path.display().to_string(),
        Some(extraction.layout),
        extraction.warnings,
        comparison,
        extraction.record.regime,
    ))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "regime",
        "employee_name",
        "assessment_year",
        "gross_salary",
        "taxable_income",
        "tds_deducted",
        "total_tax_payable",
        "refund",
        "old_regime_tax",
        "new_regime_tax",
        "better_regime",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(report) = &result.report {
            let form16 = &report.record.form16;
            wtr.write_record([
                filename,
                "success",
                form16.regime.as_str(),
                &form16.employee_name,
                &form16.assessment_year,
                &form16.gross_salary.to_string(),
                &form16.taxable_income.to_string(),
                &form16.tds_deducted.to_string(),
                &form16.total_tax_payable.to_string(),
                &form16.refund.to_string(),
                &report.old_regime_tax.to_string(),
                &report.new_regime_tax.to_string(),
                report.better_regime.as_str(),
                &report.warnings.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
