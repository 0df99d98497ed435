//! Rule-based Form 16 parser.

use std::time::Instant;

use lazy_static::lazy_static;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::record::Form16Record;

use super::layout::{detect, DetectionCue, DocumentLayout};
use super::rules::{
    assessment_year_new, assessment_year_old, employee_name_new, employee_name_old,
    patterns::*, FieldExtractor, Locator,
};
use super::Form16Extractor;

/// Lines scanned after "1 GROSS SALARY" for the "Total Rs." row.
const GROSS_SALARY_WINDOW: usize = 15;

/// Lines scanned after the salary-head label for its "Rs." amount.
const SALARY_HEAD_WINDOW: usize = 4;

/// Monetary fields of a [`Form16Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    GrossSalary,
    StandardDeduction,
    TaxableIncome,
    TdsDeducted,
    TotalTaxPayable,
    Refund,
}

impl AmountField {
    /// Human-readable field name used in warnings.
    pub fn label(&self) -> &'static str {
        match self {
            AmountField::GrossSalary => "gross salary",
            AmountField::StandardDeduction => "standard deduction",
            AmountField::TaxableIncome => "taxable income",
            AmountField::TdsDeducted => "TDS deducted",
            AmountField::TotalTaxPayable => "total tax payable",
            AmountField::Refund => "refund",
        }
    }

    fn slot<'r>(&self, record: &'r mut Form16Record) -> &'r mut i64 {
        match self {
            AmountField::GrossSalary => &mut record.gross_salary,
            AmountField::StandardDeduction => &mut record.standard_deduction,
            AmountField::TaxableIncome => &mut record.taxable_income,
            AmountField::TdsDeducted => &mut record.tds_deducted,
            AmountField::TotalTaxPayable => &mut record.total_tax_payable,
            AmountField::Refund => &mut record.refund,
        }
    }
}

lazy_static! {
    static ref NEW_LAYOUT_AMOUNTS: Vec<(AmountField, Locator)> = vec![
        (AmountField::GrossSalary, Locator::LabeledLine(vec![&*NEW_GROSS_SALARY])),
        (AmountField::StandardDeduction, Locator::LabeledLine(vec![&*NEW_STANDARD_DEDUCTION])),
        (AmountField::TaxableIncome, Locator::LabeledLine(vec![&*NEW_TAXABLE_INCOME])),
        (
            AmountField::TotalTaxPayable,
            Locator::FirstOf(vec![
                Locator::LabeledLine(vec![&*NET_TAX_ROUNDED]),
                Locator::LabeledLine(vec![&*NET_TAX_5_MINUS_6]),
                Locator::LabeledLine(vec![&*TAX_PAYABLE_3_PLUS_4]),
            ]),
        ),
        (
            AmountField::TdsDeducted,
            Locator::FirstOf(vec![
                Locator::LabeledLine(vec![&*TDS_9_PLUS_10]),
                Locator::LabeledLine(vec![&*TDS_COMPANY_TOTAL]),
                Locator::Sum(vec![
                    Locator::LabeledLine(vec![&*TDS_JANUARY]),
                    Locator::LabeledLine(vec![&*TDS_FEBRUARY]),
                ]),
            ]),
        ),
        (AmountField::Refund, Locator::LabeledLine(vec![&*NEW_REFUND])),
    ];

    static ref OLD_LAYOUT_AMOUNTS: Vec<(AmountField, Locator)> = vec![
        (
            AmountField::GrossSalary,
            Locator::Window {
                anchor: &*OLD_GROSS_SALARY,
                value: &*TOTAL_RS_AMOUNT,
                lines: GROSS_SALARY_WINDOW,
            },
        ),
        (AmountField::StandardDeduction, Locator::FirstAfterLabel(&*OLD_STANDARD_DEDUCTION)),
        (
            AmountField::TaxableIncome,
            Locator::Window {
                anchor: &*SALARY_HEAD_INCOME,
                value: &*RS_AMOUNT,
                lines: SALARY_HEAD_WINDOW,
            },
        ),
        (AmountField::TdsDeducted, Locator::BelowLabel(&*LESS_TDS)),
        (AmountField::TotalTaxPayable, Locator::FirstAfterLabel(&*OLD_TOTAL_TAX_PAYABLE)),
        (AmountField::Refund, Locator::Overpayment(&*BALANCE_PAYABLE_REFUNDABLE)),
    ];
}

/// Result of Form 16 extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted record; unresolved fields keep their defaults.
    pub record: Form16Record,
    /// Layout the rules were chosen for.
    pub layout: DocumentLayout,
    /// Cue that decided the layout.
    pub cue: DetectionCue,
    /// One entry per field that fell back to its default.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Nothing could be extracted; the caller should ask for manual entry.
    pub fn is_soft_failure(&self) -> bool {
        self.record.is_all_defaults()
    }
}

/// Form 16 parser driven by per-layout extraction rules.
#[derive(Debug, Clone)]
pub struct Form16Parser {
    /// Skip detection and use this layout.
    force_layout: Option<DocumentLayout>,
    /// Log a warning when nothing could be extracted.
    warn_on_defaults: bool,
}

impl Form16Parser {
    /// Create a parser that detects the layout from the text.
    pub fn new() -> Self {
        Self {
            force_layout: None,
            warn_on_defaults: true,
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            force_layout: config.force_layout,
            warn_on_defaults: config.warn_on_defaults,
        }
    }

    /// Force a layout, or restore detection with `None`.
    pub fn with_layout(mut self, layout: Option<DocumentLayout>) -> Self {
        self.force_layout = layout;
        self
    }

    /// Set whether a soft failure is logged as a warning.
    pub fn with_default_warning(mut self, warn: bool) -> Self {
        self.warn_on_defaults = warn;
        self
    }

    fn extract_employee_name(&self, layout: DocumentLayout, text: &str) -> Option<String> {
        match layout {
            DocumentLayout::New => employee_name_new(text),
            DocumentLayout::Old => employee_name_old(text),
        }
    }

    fn extract_assessment_year(&self, layout: DocumentLayout, text: &str) -> Option<String> {
        match layout {
            DocumentLayout::New => assessment_year_new(text),
            DocumentLayout::Old => assessment_year_old(text),
        }
    }

    fn amount_rules(&self, layout: DocumentLayout) -> &'static [(AmountField, Locator)] {
        match layout {
            DocumentLayout::New => NEW_LAYOUT_AMOUNTS.as_slice(),
            DocumentLayout::Old => OLD_LAYOUT_AMOUNTS.as_slice(),
        }
    }

    /// Parse Form 16 text into a record. Never fails: unresolved fields
    /// keep their defaults and are reported as warnings.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing Form 16 from {} characters of text", text.len());

        let (layout, cue) = match self.force_layout {
            Some(layout) => (layout, DetectionCue::Forced),
            None => {
                let detection = detect(text);
                (detection.layout, detection.cue)
            }
        };

        let mut record = Form16Record::new(layout.regime());

        match self.extract_employee_name(layout, text) {
            Some(name) => record.employee_name = name,
            None => warnings.push("Could not extract employee name".to_string()),
        }

        match self.extract_assessment_year(layout, text) {
            Some(year) => record.assessment_year = year,
            None => warnings.push("Could not extract assessment year".to_string()),
        }

        for (field, locator) in self.amount_rules(layout) {
            match locator.extract(text) {
                Some(amount) => {
                    debug!("{}: {}", field.label(), amount);
                    *field.slot(&mut record) = amount;
                }
                None => warnings.push(format!("Could not extract {}", field.label())),
            }
        }

        if self.warn_on_defaults && record.is_all_defaults() {
            warn!("No Form 16 fields could be extracted from the {} layout", layout);
        }

        debug!(
            "Extracted {} layout record for {} with {} warnings",
            layout,
            record.employee_name,
            warnings.len()
        );

        ExtractionResult {
            record,
            layout,
            cue,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for Form16Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Form16Extractor for Form16Parser {
    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.parse(text)
    }
}
