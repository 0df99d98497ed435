//! Compute command - tax on a stated income without a document.

use clap::Args;
use tracing::info;

use form16_core::{clean_number, DeductionEngine, Form16Record, Regime, TaxCalculator};

use super::report::{OutputFormat, TaxReport};
use super::{collect_deductions, load_config, suggestion_rng};

/// Arguments for the compute command.
#[derive(Args)]
pub struct ComputeArgs {
    /// Gross salary, e.g. 1066058 or "10,66,058"
    #[arg(long)]
    income: String,

    /// Standard deduction subtracted from the income
    #[arg(long, default_value = "0")]
    standard_deduction: String,

    /// Regime of the primary record
    #[arg(short, long, value_enum, default_value = "old")]
    regime: RegimeArg,

    /// Deduction input as KEY=VALUE (repeatable)
    #[arg(short, long = "deduction")]
    deductions: Vec<String>,

    /// Deduction inputs as a JSON object, inline or a file path
    #[arg(long = "deductions")]
    deductions_json: Option<String>,

    /// Seed for suggestion sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum RegimeArg {
    Old,
    New,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::Old => Regime::Old,
            RegimeArg::New => Regime::New,
        }
    }
}

pub async fn run(args: ComputeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let income = clean_number(args.income.as_str());
    if income < 0 {
        anyhow::bail!("Income cannot be negative: {}", args.income);
    }

    let mut record = Form16Record::new(args.regime.into());
    record.gross_salary = income;
    record.standard_deduction = clean_number(args.standard_deduction.as_str()).max(0);
    record.taxable_income = record.baseline_income().max(0);
    info!("Computing tax on {} under the {} regime", income, record.regime);

    let inputs = collect_deductions(args.deductions_json.as_deref(), &args.deductions)?;
    let mut rng = suggestion_rng(args.seed, &config);
    let engine = DeductionEngine::with_calculator(TaxCalculator::from_config(&config.suggestions));
    let comparison = engine.compare(&inputs, &record, &mut rng);

    let report = TaxReport::new("manual entry", None, Vec::new(), comparison, record.regime);
    println!("{}", report.render(args.format, &config.report)?);

    Ok(())
}
