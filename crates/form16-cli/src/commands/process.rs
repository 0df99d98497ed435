//! Process command - extract a single Form 16 and compare both regimes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use form16_core::models::config::PdfConfig;
use form16_core::{
    DeductionEngine, ExtractionResult, Form16Extractor, Form16Parser, PdfExtractor, PdfProcessor,
    TaxCalculator,
};

use super::report::{OutputFormat, TaxReport};
use super::{collect_deductions, load_config, parse_assignments, suggestion_rng, LayoutArg};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Skip template detection and use this layout
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Deduction input as KEY=VALUE (repeatable), e.g. Sec80C=150000
    #[arg(short, long = "deduction")]
    deductions: Vec<String>,

    /// Deduction inputs as a JSON object, inline or a file path
    #[arg(long = "deductions")]
    deductions_json: Option<String>,

    /// Correct an extracted field as FIELD=VALUE (repeatable)
    #[arg(long = "set")]
    edits: Vec<String>,

    /// Seed for suggestion sampling
    #[arg(long)]
    seed: Option<u64>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let mut parser = Form16Parser::from_config(&config.extraction);
    if let Some(layout) = args.layout {
        parser = parser.with_layout(Some(layout.into()));
    }

    pb.set_message("Extracting fields...");
    pb.set_position(20);
    let extraction = extract_file(&args.input, &parser, &config.pdf)?;

    if extraction.is_soft_failure() {
        eprintln!(
            "{} No Form 16 fields could be read from {}; supply them with --set FIELD=VALUE",
            style("!").yellow(),
            args.input.display()
        );
    }

    let mut record = extraction.record.clone();
    let edits = parse_assignments(&args.edits)?;
    if !edits.is_empty() {
        let applied = record.apply_edits(&edits);
        if applied.len() < edits.len() {
            warn!("Ignored {} unknown or invalid field edit(s)", edits.len() - applied.len());
        }
        debug!("Applied edits: {:?}", applied);
    }

    pb.set_message("Computing tax...");
    pb.set_position(60);
    let inputs = collect_deductions(args.deductions_json.as_deref(), &args.deductions)?;
    let mut rng = suggestion_rng(args.seed, &config);
    let engine = DeductionEngine::with_calculator(TaxCalculator::from_config(&config.suggestions));
    let comparison = engine.compare(&inputs, &record, &mut rng);

    pb.finish_and_clear();

    let report = TaxReport::new(
        args.input.display().to_string(),
        Some(extraction.layout),
        extraction.warnings,
        comparison,
        record.regime,
    );
    let output = report.render(args.format, &config.report)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Extract fields from a PDF or a text file holding already-decoded text.
pub fn extract_file(
    path: &Path,
    parser: &Form16Parser,
    pdf_config: &PdfConfig,
) -> anyhow::Result<ExtractionResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::from_config(pdf_config);
            extractor.load(&data)?;
            let pages = extractor.page_texts()?;
            debug!("Decoded {} page(s)", pages.len());
            Ok(parser.extract_from_pages(&pages))
        }
        "txt" | "text" => {
            let text = fs::read_to_string(path)?;
            Ok(parser.extract_from_text(&text))
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
