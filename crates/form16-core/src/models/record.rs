//! Canonical Form 16 record and the merged record seen by the tax layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form16::rules::numbers::amount_from_value;

/// Sentinel for textual fields that could not be located in the document.
pub const NOT_FOUND: &str = "Not Found";

/// Prefix the review form uses for edits to extracted fields.
pub const PARSED_PREFIX: &str = "parsed_";

/// Open key/value map of user-entered fields (strings or numbers).
pub type FormData = BTreeMap<String, Value>;

/// Income tax regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Default regime: section-wise deductions apply.
    #[default]
    Old,
    /// Alternate regime: lower slabs, no section-wise deductions.
    New,
}

impl Regime {
    /// Canonical tag used in the transport schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Old => "old",
            Regime::New => "new",
        }
    }

    /// Parse a regime tag, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "old" | "default" => Some(Regime::Old),
            "new" | "alternate" => Some(Regime::New),
            _ => None,
        }
    }

    /// Whether chapter VI-A deductions reduce taxable income under this regime.
    pub fn allows_deductions(&self) -> bool {
        matches!(self, Regime::Old)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from a Form 16 document.
///
/// Monetary fields are whole rupees and never negative. Anything the
/// extractor cannot resolve stays at its default (zero or [`NOT_FOUND`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Form16Record {
    /// Regime implied by the document layout.
    pub regime: Regime,

    /// Employee name as printed.
    pub employee_name: String,

    /// Assessment year, `YYYY-YYYY`.
    pub assessment_year: String,

    /// Gross salary.
    pub gross_salary: i64,

    /// Standard deduction.
    pub standard_deduction: i64,

    /// Taxable income as stated on the document.
    pub taxable_income: i64,

    /// Tax deducted at source.
    pub tds_deducted: i64,

    /// Total tax payable as stated on the document.
    pub total_tax_payable: i64,

    /// Refund due to the employee.
    pub refund: i64,
}

impl Default for Form16Record {
    fn default() -> Self {
        Self::new(Regime::Old)
    }
}

impl Form16Record {
    /// Create an empty record for the given regime.
    pub fn new(regime: Regime) -> Self {
        Self {
            regime,
            employee_name: NOT_FOUND.to_string(),
            assessment_year: NOT_FOUND.to_string(),
            gross_salary: 0,
            standard_deduction: 0,
            taxable_income: 0,
            tds_deducted: 0,
            total_tax_payable: 0,
            refund: 0,
        }
    }

    /// True when no field was resolved. Callers treat this as a soft failure
    /// and ask for manual entry.
    pub fn is_all_defaults(&self) -> bool {
        *self == Self::new(self.regime)
    }

    /// Baseline taxable income: gross salary less standard deduction.
    pub fn baseline_income(&self) -> i64 {
        self.gross_salary.saturating_sub(self.standard_deduction)
    }

    /// Overlay user edits onto the record.
    ///
    /// Keys may carry the `parsed_` prefix used by the review form. Unknown
    /// keys and unparseable regime tags are skipped. Returns the names of the
    /// fields that were changed.
    pub fn apply_edits(&mut self, edits: &FormData) -> Vec<&'static str> {
        let mut applied = Vec::new();

        for (key, value) in edits {
            let key = key.strip_prefix(PARSED_PREFIX).unwrap_or(key);
            let field = match key {
                "regime" => {
                    match value.as_str().and_then(Regime::parse) {
                        Some(regime) => self.regime = regime,
                        None => continue,
                    }
                    "regime"
                }
                "employee_name" => {
                    self.employee_name = text_from_value(value);
                    "employee_name"
                }
                "assessment_year" => {
                    self.assessment_year = text_from_value(value);
                    "assessment_year"
                }
                "gross_salary" => {
                    self.gross_salary = amount_from_value(value).max(0);
                    "gross_salary"
                }
                "standard_deduction" => {
                    self.standard_deduction = amount_from_value(value).max(0);
                    "standard_deduction"
                }
                "taxable_income" => {
                    self.taxable_income = amount_from_value(value).max(0);
                    "taxable_income"
                }
                "tds_deducted" => {
                    self.tds_deducted = amount_from_value(value).max(0);
                    "tds_deducted"
                }
                "total_tax_payable" => {
                    self.total_tax_payable = amount_from_value(value).max(0);
                    "total_tax_payable"
                }
                "refund" => {
                    self.refund = amount_from_value(value).max(0);
                    "refund"
                }
                _ => continue,
            };
            applied.push(field);
        }

        applied
    }
}

fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => NOT_FOUND.to_string(),
    }
}

/// Split a review form into record edits (`parsed_` prefixed, prefix removed)
/// and deduction inputs (everything else).
pub fn split_review_fields(form: &FormData) -> (FormData, FormData) {
    let mut edits = FormData::new();
    let mut inputs = FormData::new();

    for (key, value) in form {
        match key.strip_prefix(PARSED_PREFIX) {
            Some(field) => {
                edits.insert(field.to_string(), value.clone());
            }
            None => {
                inputs.insert(key.clone(), value.clone());
            }
        }
    }

    (edits, inputs)
}

/// Extracted record merged with the deduction totals written back by the
/// aggregator. This is the single schema downstream consumers read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRecord {
    /// Extracted (and possibly user-edited) document fields.
    #[serde(flatten)]
    pub form16: Form16Record,

    /// Claimed 80C investments.
    pub section_80c: i64,

    /// Claimed 80CCD(1B) additional pension contribution.
    pub section_80ccd1b: i64,

    /// Claimed 80D health insurance, self/family plus parents.
    pub section_80d: i64,

    /// Sum of all capped section claims.
    pub total_deductions: i64,

    /// Baseline income less total deductions, floored at zero.
    pub net_taxable_income: i64,
}

impl From<Form16Record> for TaxRecord {
    fn from(form16: Form16Record) -> Self {
        let net_taxable_income = form16.baseline_income().max(0);
        Self {
            form16,
            section_80c: 0,
            section_80ccd1b: 0,
            section_80d: 0,
            total_deductions: 0,
            net_taxable_income,
        }
    }
}

impl TaxRecord {
    /// Flatten into the transport schema.
    pub fn to_fields(&self) -> FormData {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => FormData::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_regime_parse() {
        assert_eq!(Regime::parse(" NEW "), Some(Regime::New));
        assert_eq!(Regime::parse("old"), Some(Regime::Old));
        assert_eq!(Regime::parse("both"), None);
    }

    #[test]
    fn test_default_record_is_soft_failure() {
        let record = Form16Record::new(Regime::New);
        assert!(record.is_all_defaults());
        assert_eq!(record.employee_name, NOT_FOUND);

        let mut record = record;
        record.tds_deducted = 1;
        assert!(!record.is_all_defaults());
    }

    #[test]
    fn test_missing_regime_defaults_to_old() {
        let record: Form16Record = serde_json::from_value(json!({ "gross_salary": 1000 })).unwrap();
        assert_eq!(record.regime, Regime::Old);
        assert_eq!(record.gross_salary, 1000);
        assert_eq!(record.assessment_year, NOT_FOUND);
    }

    #[test]
    fn test_apply_edits() {
        let mut record = Form16Record::new(Regime::Old);
        let edits: FormData = [
            ("parsed_gross_salary".to_string(), json!("9,00,000")),
            ("standard_deduction".to_string(), json!(50000)),
            ("regime".to_string(), json!("sideways")),
            ("employee_name".to_string(), json!("  ASHA RAO ")),
            ("unknown_field".to_string(), json!(1)),
        ]
        .into_iter()
        .collect();

        let applied = record.apply_edits(&edits);

        assert_eq!(record.gross_salary, 900000);
        assert_eq!(record.standard_deduction, 50000);
        assert_eq!(record.regime, Regime::Old);
        assert_eq!(record.employee_name, "ASHA RAO");
        assert_eq!(applied.len(), 3);
    }

    #[test]
    fn test_split_review_fields() {
        let form: FormData = [
            ("parsed_refund".to_string(), json!("10")),
            ("sec80c".to_string(), json!("5000")),
        ]
        .into_iter()
        .collect();

        let (edits, inputs) = split_review_fields(&form);
        assert_eq!(edits.get("refund"), Some(&json!("10")));
        assert_eq!(inputs.get("sec80c"), Some(&json!("5000")));
    }

    #[test]
    fn test_tax_record_fields_are_flat() {
        let mut form16 = Form16Record::new(Regime::New);
        form16.gross_salary = 800000;
        form16.standard_deduction = 75000;

        let record = TaxRecord::from(form16);
        let fields = record.to_fields();

        assert_eq!(record.net_taxable_income, 725000);
        assert_eq!(fields.get("regime"), Some(&json!("new")));
        assert_eq!(fields.get("gross_salary"), Some(&json!(800000)));
        assert_eq!(fields.get("net_taxable_income"), Some(&json!(725000)));
    }
}
