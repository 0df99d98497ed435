//! Report assembly and rendering shared by `process` and `compute`.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use form16_core::form16::rules::format_amount;
use form16_core::models::config::ReportConfig;
use form16_core::{DeductionRecord, DocumentLayout, Regime, RegimeComparison, TaxRecord, TaxSummary};

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Human-readable text
    #[default]
    Text,
}

/// One processed statement: the record under its own regime plus the
/// liability under both regimes.
#[derive(Debug, Clone, Serialize)]
pub struct TaxReport {
    pub source: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<DocumentLayout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub record: TaxRecord,
    pub deductions: DeductionRecord,
    pub tax: TaxSummary,
    pub old_regime_tax: i64,
    pub new_regime_tax: i64,
    pub better_regime: Regime,
}

impl TaxReport {
    /// Build a report from a comparison, keeping the run for `regime` as the
    /// primary record.
    pub fn new(
        source: impl Into<String>,
        layout: Option<DocumentLayout>,
        warnings: Vec<String>,
        comparison: RegimeComparison,
        regime: Regime,
    ) -> Self {
        let old_regime_tax = comparison.old.final_tax();
        let new_regime_tax = comparison.new.final_tax();
        let outcome = match regime {
            Regime::Old => comparison.old,
            Regime::New => comparison.new,
        };

        Self {
            source: source.into(),
            generated_at: chrono::Local::now().to_rfc3339(),
            layout,
            warnings,
            record: outcome.record,
            deductions: outcome.deductions,
            tax: outcome.tax,
            old_regime_tax,
            new_regime_tax,
            better_regime: comparison.better,
        }
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat, config: &ReportConfig) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string(self)?),
            OutputFormat::Csv => self.to_csv(),
            OutputFormat::Text => self.to_text(config),
        }
    }

    fn to_csv(&self) -> anyhow::Result<String> {
        let record = &self.record;
        let form16 = &record.form16;

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([
            "source",
            "regime",
            "employee_name",
            "assessment_year",
            "gross_salary",
            "standard_deduction",
            "taxable_income",
            "tds_deducted",
            "total_tax_payable",
            "refund",
            "section_80c",
            "section_80ccd1b",
            "section_80d",
            "total_deductions",
            "net_taxable_income",
            "old_regime_tax",
            "new_regime_tax",
            "better_regime",
        ])?;
        wtr.write_record([
            self.source.clone(),
            form16.regime.to_string(),
            form16.employee_name.clone(),
            form16.assessment_year.clone(),
            form16.gross_salary.to_string(),
            form16.standard_deduction.to_string(),
            form16.taxable_income.to_string(),
            form16.tds_deducted.to_string(),
            form16.total_tax_payable.to_string(),
            form16.refund.to_string(),
            record.section_80c.to_string(),
            record.section_80ccd1b.to_string(),
            record.section_80d.to_string(),
            record.total_deductions.to_string(),
            record.net_taxable_income.to_string(),
            self.old_regime_tax.to_string(),
            self.new_regime_tax.to_string(),
            self.better_regime.to_string(),
        ])?;

        let bytes = wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to write CSV: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }

    fn to_text(&self, config: &ReportConfig) -> anyhow::Result<String> {
        let money = |amount: i64| {
            let sign = if amount < 0 { "-" } else { "" };
            format!(
                "{}{}{}",
                sign,
                config.currency_symbol,
                format_amount(amount, config.indian_grouping)
            )
        };
        let form16 = &self.record.form16;
        let mut out = String::new();

        writeln!(out, "Form 16 Tax Report")?;
        writeln!(out, "==================")?;
        writeln!(out, "Source:             {}", self.source)?;
        writeln!(out, "Employee:           {}", form16.employee_name)?;
        writeln!(out, "Assessment year:    {}", form16.assessment_year)?;
        match self.layout {
            Some(layout) => writeln!(out, "Regime:             {} (document layout: {})", form16.regime, layout)?,
            None => writeln!(out, "Regime:             {}", form16.regime)?,
        }

        writeln!(out)?;
        writeln!(out, "Salary")?;
        writeln!(out, "  Gross salary:       {}", money(form16.gross_salary))?;
        writeln!(out, "  Standard deduction: {}", money(form16.standard_deduction))?;
        writeln!(out, "  Taxable income:     {}", money(form16.taxable_income))?;
        writeln!(out, "  TDS deducted:       {}", money(form16.tds_deducted))?;
        writeln!(out, "  Total tax payable:  {}", money(form16.total_tax_payable))?;
        writeln!(out, "  Refund:             {}", money(form16.refund))?;

        writeln!(out)?;
        writeln!(out, "Deductions")?;
        if self.deductions.claims.is_empty() {
            writeln!(out, "  (none allowed under the {} regime)", self.deductions.regime)?;
        }
        for claim in &self.deductions.claims {
            writeln!(out, "  {}: {}", claim.label, money(claim.claimed))?;
        }
        writeln!(out, "  Total deductions:   {}", money(self.deductions.total_deductions))?;
        writeln!(out, "  Net taxable income: {}", money(self.deductions.net_taxable_income))?;

        writeln!(out)?;
        writeln!(out, "Tax")?;
        writeln!(out, "  Old regime:         {}", money(self.old_regime_tax))?;
        writeln!(out, "  New regime:         {}", money(self.new_regime_tax))?;
        writeln!(out, "  Better regime:      {}", self.better_regime)?;

        if let Some(suggestions) = &self.tax.suggestions {
            writeln!(out)?;
            writeln!(out, "Suggestions")?;
            for (title, section) in [
                ("80C (Investments)", &suggestions.investments),
                ("NPS (80CCD(1B))", &suggestions.pension),
                ("Health Insurance (80D)", &suggestions.health_insurance),
            ] {
                writeln!(
                    out,
                    "  {}: claimed {} of {}, {} remaining",
                    title,
                    money(section.claimed),
                    money(section.limit),
                    money(section.remaining)
                )?;
                for option in &section.options {
                    writeln!(out, "    - {}", option)?;
                }
                writeln!(out, "    {}", section.note)?;
            }
            for advice in &suggestions.general_advice {
                writeln!(out, "  * {}", advice)?;
            }
        }

        for group in &self.tax.quick_tips {
            writeln!(out)?;
            writeln!(out, "{}", group.section)?;
            for tip in &group.tips {
                writeln!(out, "  - {}", tip)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(out)?;
            writeln!(out, "Warnings")?;
            for warning in &self.warnings {
                writeln!(out, "  ! {}", warning)?;
            }
        }

        Ok(out)
    }
}
