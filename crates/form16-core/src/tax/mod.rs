//! Tax computation module.

pub mod slabs;
pub mod suggestions;

pub use slabs::{new_regime_tax, old_regime_tax, regime_tax, Slabs, NEW_REGIME, OLD_REGIME};
pub use suggestions::{
    generate_suggestions, quick_tips, ClaimedSections, QuickTips, SectionSuggestion, Suggestions,
};

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deductions::{normalize_keys, CanonicalKey};
use crate::form16::rules::{amount_from_value, decimal_from_value};
use crate::models::config::SuggestionConfig;
use crate::models::record::{FormData, Regime};

/// Income fields read by [`compute_tax`], first usable value wins.
pub const INCOME_KEYS: [&str; 3] = ["net_taxable_income", "taxable_income", "income"];

/// Liability under one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTax {
    pub final_tax: i64,
}

/// Liability under both regimes plus advisory suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Income both liabilities were computed on.
    pub income: Decimal,
    pub old: RegimeTax,
    pub new: RegimeTax,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Suggestions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_tips: Vec<QuickTips>,
}

impl TaxSummary {
    /// Liability under `regime`.
    pub fn liability(&self, regime: Regime) -> i64 {
        match regime {
            Regime::Old => self.old.final_tax,
            Regime::New => self.new.final_tax,
        }
    }

    /// Regime with the strictly lower liability; `New` on a tie.
    pub fn cheaper_regime(&self) -> Regime {
        if self.old.final_tax < self.new.final_tax {
            Regime::Old
        } else {
            Regime::New
        }
    }
}

/// Computes both regimes' liability and the suggestion bundle.
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    /// Attach the suggestion bundle.
    suggestions: bool,
    /// Quick tips per category (0 = none).
    quick_tips_per_section: usize,
}

impl TaxCalculator {
    /// Calculator with suggestions and no quick tips.
    pub fn new() -> Self {
        Self {
            suggestions: true,
            quick_tips_per_section: 0,
        }
    }

    /// Calculator from suggestion settings.
    pub fn from_config(config: &SuggestionConfig) -> Self {
        Self {
            suggestions: config.enabled,
            quick_tips_per_section: if config.enabled { config.quick_tips_per_section } else { 0 },
        }
    }

    /// Enable or disable the suggestion bundle.
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggestions = enabled;
        self
    }

    /// Set the number of quick tips per category.
    pub fn with_quick_tips(mut self, per_section: usize) -> Self {
        self.quick_tips_per_section = per_section;
        self
    }

    /// Compute the summary for an income. Negative income is taxed as zero.
    pub fn compute<R: Rng + ?Sized>(
        &self,
        income: Decimal,
        claimed: ClaimedSections,
        rng: &mut R,
    ) -> TaxSummary {
        let income = income.max(Decimal::ZERO);
        let old = RegimeTax {
            final_tax: OLD_REGIME.tax(income),
        };
        let new = RegimeTax {
            final_tax: NEW_REGIME.tax(income),
        };

        debug!("Tax on {}: old {}, new {}", income, old.final_tax, new.final_tax);

        let suggestions = self
            .suggestions
            .then(|| generate_suggestions(claimed, rng));
        let quick_tips = if self.quick_tips_per_section > 0 {
            quick_tips(self.quick_tips_per_section, rng)
        } else {
            Vec::new()
        };

        TaxSummary {
            income,
            old,
            new,
            suggestions,
            quick_tips,
        }
    }

    /// Compute the summary from an untyped field map.
    ///
    /// Keys are normalized first. Income is the first usable value among
    /// [`INCOME_KEYS`], else 0. Claimed 80D is the combined figure when
    /// present, else self plus parents.
    pub fn compute_fields<R: Rng + ?Sized>(&self, fields: &FormData, rng: &mut R) -> TaxSummary {
        let fields = normalize_keys(fields);

        let income = INCOME_KEYS
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(decimal_from_value)
            .unwrap_or(Decimal::ZERO);

        let amount = |key: CanonicalKey| fields.get(key.as_str()).map(amount_from_value);
        let section_80d = amount(CanonicalKey::Section80d).unwrap_or_else(|| {
            amount(CanonicalKey::Section80dSelf)
                .unwrap_or(0)
                .saturating_add(amount(CanonicalKey::Section80dParents).unwrap_or(0))
        });
        let claimed = ClaimedSections {
            section_80c: amount(CanonicalKey::Section80c).unwrap_or(0),
            section_80ccd1b: amount(CanonicalKey::Section80ccd1b).unwrap_or(0),
            section_80d,
        };

        self.compute(income, claimed, rng)
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute both regimes' liability and suggestions from a field map.
pub fn compute_tax<R: Rng + ?Sized>(fields: &FormData, rng: &mut R) -> TaxSummary {
    TaxCalculator::new().compute_fields(fields, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn fields(entries: &[(&str, serde_json::Value)]) -> FormData {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_income_key_order() {
        let mut rng = StdRng::seed_from_u64(0);
        let summary = compute_tax(
            &fields(&[
                ("taxable_income", json!(1_016_058)),
                ("net_taxable_income", json!("8,66,058")),
            ]),
            &mut rng,
        );

        assert_eq!(summary.income, Decimal::from(866_058));
        assert_eq!(summary.old.final_tax, 141_140);
    }

    #[test]
    fn test_income_synonym_and_fallbacks() {
        let mut rng = StdRng::seed_from_u64(0);

        let summary = compute_tax(&fields(&[("Taxable Income", json!("₹ 8,00,000"))]), &mut rng);
        assert_eq!(summary.new.final_tax, 31_200);

        // Unusable values fall through to the next key.
        let summary = compute_tax(
            &fields(&[("net_taxable_income", json!("")), ("income", json!(800000))]),
            &mut rng,
        );
        assert_eq!(summary.income, Decimal::from(800_000));

        let summary = compute_tax(&FormData::new(), &mut rng);
        assert_eq!(summary.income, Decimal::ZERO);
        assert_eq!(summary.old.final_tax, 0);
        assert_eq!(summary.new.final_tax, 0);
    }

    #[test]
    fn test_negative_income_is_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        let summary = compute_tax(&fields(&[("income", json!(-5))]), &mut rng);
        assert_eq!(summary.income, Decimal::ZERO);
    }

    #[test]
    fn test_claimed_sections_feed_suggestions() {
        let mut rng = StdRng::seed_from_u64(0);
        let summary = compute_tax(
            &fields(&[
                ("income", json!(900000)),
                ("sec80c", json!("1,00,000")),
                ("medical_self", json!(10000)),
                ("medical_parents", json!(5000)),
            ]),
            &mut rng,
        );

        let suggestions = summary.suggestions.unwrap();
        assert_eq!(suggestions.investments.claimed, 100_000);
        assert_eq!(suggestions.investments.remaining, 50_000);
        assert_eq!(suggestions.health_insurance.claimed, 15_000);
        assert_eq!(suggestions.health_insurance.remaining, 10_000);
    }

    #[test]
    fn test_extreme_claims_and_income() {
        let mut rng = StdRng::seed_from_u64(0);
        let summary = compute_tax(
            &fields(&[
                ("income", json!("9223372036854775807")),
                ("medical_self", json!("9223372036854775807")),
                ("medical_parents", json!(i64::MAX)),
                ("sec80c", json!(i64::MIN)),
            ]),
            &mut rng,
        );

        assert_eq!(summary.income, Decimal::from(i64::MAX));
        assert!(summary.old.final_tax > 0);
        let suggestions = summary.suggestions.unwrap();
        assert_eq!(suggestions.health_insurance.claimed, i64::MAX);
        assert_eq!(suggestions.health_insurance.remaining, 0);
        assert_eq!(suggestions.investments.remaining, 150_000);
    }

    #[test]
    fn test_calculator_settings() {
        let config = SuggestionConfig {
            enabled: true,
            seed: None,
            quick_tips_per_section: 1,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let summary = TaxCalculator::from_config(&config).compute(
            Decimal::from(600_000),
            ClaimedSections::default(),
            &mut rng,
        );
        assert_eq!(summary.quick_tips.len(), 5);
        assert!(summary.quick_tips.iter().all(|t| t.tips.len() == 1));

        let summary = TaxCalculator::new()
            .with_suggestions(false)
            .compute(Decimal::from(600_000), ClaimedSections::default(), &mut rng);
        assert!(summary.suggestions.is_none());
        assert!(summary.quick_tips.is_empty());
        assert_eq!(summary.cheaper_regime(), Regime::New);
    }
}
