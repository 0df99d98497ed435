//! Chapter VI-A deduction sections and their claim limits.

use serde::{Deserialize, Serialize};

use super::keys::CanonicalKey;

/// Disability severity (percent) at or above which the higher amount applies.
pub const SEVERE_DISABILITY: i64 = 80;

/// Minimum disability severity (percent) that qualifies at all.
pub const DISABILITY: i64 = 40;

pub const SEVERE_DISABILITY_AMOUNT: i64 = 125_000;
pub const DISABILITY_AMOUNT: i64 = 75_000;

/// Deduction sections claimable under the old regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// 80C investments (PPF, ELSS, LIC and similar).
    Investments,
    /// 80CCD(1B) additional NPS contribution.
    PensionAdditional,
    /// 80D health insurance for self and family.
    HealthSelf,
    /// 80D health insurance for parents.
    HealthParents,
    /// 80E education loan interest.
    EducationLoan,
    /// 80G donations.
    Donations,
    /// 80TTA savings account interest.
    SavingsInterest,
    /// 80EEB electric vehicle loan interest.
    EvLoanInterest,
    /// 80U disability of the taxpayer.
    DisabilitySelf,
    /// 80DD disability of a dependent.
    DisabilityDependent,
}

impl Section {
    /// Every section, in claim order.
    pub const ALL: [Section; 10] = [
        Section::Investments,
        Section::PensionAdditional,
        Section::HealthSelf,
        Section::HealthParents,
        Section::EducationLoan,
        Section::Donations,
        Section::SavingsInterest,
        Section::EvLoanInterest,
        Section::DisabilitySelf,
        Section::DisabilityDependent,
    ];

    /// Input keys read for this section, first non-empty wins.
    pub fn input_keys(&self) -> &'static [CanonicalKey] {
        match self {
            Section::Investments => &[CanonicalKey::Section80c],
            Section::PensionAdditional => &[CanonicalKey::Section80ccd1b],
            Section::HealthSelf => &[CanonicalKey::Section80dSelf, CanonicalKey::Section80d],
            Section::HealthParents => &[CanonicalKey::Section80dParents],
            Section::EducationLoan => &[CanonicalKey::Section80e],
            Section::Donations => &[CanonicalKey::Section80g],
            Section::SavingsInterest => &[CanonicalKey::Section80tta],
            Section::EvLoanInterest => &[CanonicalKey::Section80eeb],
            Section::DisabilitySelf => &[CanonicalKey::DisabilitySelf],
            Section::DisabilityDependent => &[CanonicalKey::DisabilityDependent],
        }
    }

    /// Flat claim limit, `None` when uncapped or severity-based.
    pub fn cap(&self) -> Option<i64> {
        match self {
            Section::Investments => Some(150_000),
            Section::PensionAdditional => Some(50_000),
            Section::HealthSelf => Some(25_000),
            Section::HealthParents => Some(50_000),
            Section::SavingsInterest => Some(10_000),
            Section::EvLoanInterest => Some(150_000),
            Section::EducationLoan
            | Section::Donations
            | Section::DisabilitySelf
            | Section::DisabilityDependent => None,
        }
    }

    /// Disability sections read a severity, not an amount.
    pub fn is_severity_based(&self) -> bool {
        matches!(self, Section::DisabilitySelf | Section::DisabilityDependent)
    }

    /// Allowed claim for an entered value.
    ///
    /// Amounts are floored at zero and capped. Disability sections read the
    /// value as a severity percentage and map it to a fixed amount.
    pub fn claim(&self, entered: i64) -> i64 {
        if self.is_severity_based() {
            return disability_amount(entered);
        }

        let amount = entered.max(0);
        match self.cap() {
            Some(cap) => amount.min(cap),
            None => amount,
        }
    }

    /// Report label for a claim of `amount`.
    pub fn label(&self, amount: i64) -> &'static str {
        let severe = amount >= SEVERE_DISABILITY_AMOUNT;
        match self {
            Section::Investments => "80C (PPF/ELSS/LIC etc.)",
            Section::PensionAdditional => "80CCD(1B) (NPS Additional)",
            Section::HealthSelf => "80D (Self+Family)",
            Section::HealthParents => "80D (Parents)",
            Section::EducationLoan => "80E (Education Loan Interest)",
            Section::Donations => "80G (Donations)",
            Section::SavingsInterest => "80TTA (Savings Interest)",
            Section::EvLoanInterest => "80EEB (EV Loan Interest)",
            Section::DisabilitySelf if severe => "80U (Severe Disability - Self)",
            Section::DisabilitySelf => "80U (Disability - Self)",
            Section::DisabilityDependent if severe => "80DD (Severe Disability - Dependent)",
            Section::DisabilityDependent => "80DD (Disability - Dependent)",
        }
    }
}

/// Fixed deduction for a disability severity on a 0-100 scale.
pub fn disability_amount(severity: i64) -> i64 {
    if severity >= SEVERE_DISABILITY {
        SEVERE_DISABILITY_AMOUNT
    } else if severity >= DISABILITY {
        DISABILITY_AMOUNT
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_caps() {
        assert_eq!(Section::Investments.claim(300_000), 150_000);
        assert_eq!(Section::Investments.claim(120_000), 120_000);
        assert_eq!(Section::PensionAdditional.claim(80_000), 50_000);
        assert_eq!(Section::HealthSelf.claim(40_000), 25_000);
        assert_eq!(Section::HealthParents.claim(60_000), 50_000);
        assert_eq!(Section::SavingsInterest.claim(12_000), 10_000);
        assert_eq!(Section::EvLoanInterest.claim(200_000), 150_000);
    }

    #[test]
    fn test_uncapped_sections_floor_at_zero() {
        assert_eq!(Section::EducationLoan.claim(-500), 0);
        assert_eq!(Section::EducationLoan.claim(400_000), 400_000);
        assert_eq!(Section::Donations.claim(-1), 0);
        assert_eq!(Section::Investments.claim(-10_000), 0);
    }

    #[test]
    fn test_disability_bands() {
        assert_eq!(disability_amount(39), 0);
        assert_eq!(disability_amount(40), 75_000);
        assert_eq!(disability_amount(79), 75_000);
        assert_eq!(disability_amount(80), 125_000);
        assert_eq!(Section::DisabilityDependent.claim(100), 125_000);
        assert_eq!(Section::DisabilitySelf.label(125_000), "80U (Severe Disability - Self)");
        assert_eq!(Section::DisabilitySelf.label(75_000), "80U (Disability - Self)");
    }
}
