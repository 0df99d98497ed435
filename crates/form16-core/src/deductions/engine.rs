//! Deduction aggregation and regime comparison.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::keys::normalize_keys;
use super::sections::Section;
use crate::form16::rules::amount_from_value;
use crate::models::record::{Form16Record, FormData, Regime, TaxRecord};
use crate::tax::{ClaimedSections, TaxCalculator, TaxSummary};

/// Allowed claim under one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionClaim {
    pub section: Section,
    pub label: String,
    /// Value as entered, after cleaning.
    pub entered: i64,
    /// Amount allowed after caps and bands.
    pub claimed: i64,
}

/// Section-wise deductions and the resulting net taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRecord {
    pub regime: Regime,
    /// Gross salary less standard deduction.
    pub baseline_income: i64,
    /// Empty under the new regime.
    pub claims: Vec<SectionClaim>,
    pub total_deductions: i64,
    /// `max(0, baseline_income - total_deductions)`.
    pub net_taxable_income: i64,
}

impl DeductionRecord {
    /// Claimed amount for a section, 0 when not claimed.
    pub fn claimed(&self, section: Section) -> i64 {
        self.claims
            .iter()
            .filter(|claim| claim.section == section)
            .map(|claim| claim.claimed)
            .fold(0, i64::saturating_add)
    }
}

/// Everything one aggregation run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionOutcome {
    pub regime: Regime,
    pub deductions: DeductionRecord,
    /// Record with the canonical deduction totals written back.
    pub record: TaxRecord,
    /// Liability computed on the net taxable income.
    pub tax: TaxSummary,
}

impl DeductionOutcome {
    /// Liability under this run's own regime.
    pub fn final_tax(&self) -> i64 {
        self.tax.liability(self.regime)
    }
}

/// Outcomes under both regimes for the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old: DeductionOutcome,
    pub new: DeductionOutcome,
    pub better: Regime,
}

/// Applies regime rules to user deductions and computes the resulting tax.
#[derive(Debug, Clone, Default)]
pub struct DeductionEngine {
    calculator: TaxCalculator,
}

/// First entered value among the section's input keys, ignoring null and
/// empty strings.
fn entered_value(inputs: &FormData, section: Section) -> i64 {
    section
        .input_keys()
        .iter()
        .filter_map(|key| inputs.get(key.as_str()))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
        .map(amount_from_value)
        .unwrap_or(0)
}

impl DeductionEngine {
    /// Engine with a default calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine using the given calculator.
    pub fn with_calculator(calculator: TaxCalculator) -> Self {
        Self { calculator }
    }

    /// Section-wise deductions for already-normalized inputs.
    pub fn deductions(&self, inputs: &FormData, regime: Regime, baseline_income: i64) -> DeductionRecord {
        let mut claims = Vec::new();

        if regime.allows_deductions() {
            for section in Section::ALL {
                let entered = entered_value(inputs, section);
                let claimed = section.claim(entered);
                if section.is_severity_based() && claimed == 0 {
                    continue;
                }
                debug!("{}: entered {}, claimed {}", section.label(claimed), entered, claimed);
                claims.push(SectionClaim {
                    section,
                    label: section.label(claimed).to_string(),
                    entered,
                    claimed,
                });
            }
        }

        let total_deductions = claims
            .iter()
            .map(|claim| claim.claimed)
            .fold(0, i64::saturating_add);
        DeductionRecord {
            regime,
            baseline_income,
            claims,
            total_deductions,
            net_taxable_income: baseline_income.saturating_sub(total_deductions).max(0),
        }
    }

    /// Aggregate user deductions against a record and compute tax.
    ///
    /// User keys are normalized first. The record's regime decides whether
    /// any section applies.
    pub fn aggregate<R: Rng + ?Sized>(
        &self,
        user: &FormData,
        record: &Form16Record,
        rng: &mut R,
    ) -> DeductionOutcome {
        let inputs = normalize_keys(user);
        let regime = record.regime;
        let deductions = self.deductions(&inputs, regime, record.baseline_income());

        let mut merged = TaxRecord::from(record.clone());
        merged.section_80c = deductions.claimed(Section::Investments);
        merged.section_80ccd1b = deductions.claimed(Section::PensionAdditional);
        merged.section_80d = deductions
            .claimed(Section::HealthSelf)
            .saturating_add(deductions.claimed(Section::HealthParents));
        merged.total_deductions = deductions.total_deductions;
        merged.net_taxable_income = deductions.net_taxable_income;

        let claimed = ClaimedSections {
            section_80c: merged.section_80c,
            section_80ccd1b: merged.section_80ccd1b,
            section_80d: merged.section_80d,
        };
        let tax = self
            .calculator
            .compute(Decimal::from(merged.net_taxable_income), claimed, rng);

        info!(
            "{} regime: deductions {}, net taxable {}, tax {}",
            regime,
            deductions.total_deductions,
            deductions.net_taxable_income,
            tax.liability(regime)
        );

        DeductionOutcome {
            regime,
            deductions,
            record: merged,
            tax,
        }
    }

    /// Run aggregation under both regimes and pick the one with the lower
    /// liability, each run judged under its own regime. Ties go to the new
    /// regime.
    pub fn compare<R: Rng + ?Sized>(
        &self,
        user: &FormData,
        record: &Form16Record,
        rng: &mut R,
    ) -> RegimeComparison {
        let run = |regime: Regime, rng: &mut R| {
            let mut record = record.clone();
            record.regime = regime;
            self.aggregate(user, &record, rng)
        };
        let old = run(Regime::Old, &mut *rng);
        let new = run(Regime::New, &mut *rng);

        let better = if old.final_tax() < new.final_tax() {
            Regime::Old
        } else {
            Regime::New
        };
        debug!("Old {} vs new {}: {} is better", old.final_tax(), new.final_tax(), better);

        RegimeComparison { old, new, better }
    }
}

/// Aggregate user deductions against a record with the default engine.
pub fn aggregate_deductions<R: Rng + ?Sized>(
    user: &FormData,
    record: &Form16Record,
    rng: &mut R,
) -> DeductionOutcome {
    DeductionEngine::new().aggregate(user, record, rng)
}

/// Compare both regimes with the default engine.
pub fn compare_regimes<R: Rng + ?Sized>(
    user: &FormData,
    record: &Form16Record,
    rng: &mut R,
) -> RegimeComparison {
    DeductionEngine::new().compare(user, record, rng)
}
