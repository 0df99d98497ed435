//! Tax-saving suggestions drawn from static content pools.
//!
//! Sampling goes through a caller-supplied [`Rng`]; pass a seeded
//! `StdRng` for reproducible output.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Amounts already claimed in the sections that get suggestions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedSections {
    pub section_80c: i64,
    pub section_80ccd1b: i64,
    pub section_80d: i64,
}

/// Suggestion for one deduction section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSuggestion {
    pub claimed: i64,
    pub limit: i64,
    pub remaining: i64,
    pub options: Vec<String>,
    pub note: String,
}

/// Advisory bundle attached to every tax summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(rename = "80C (Investments)")]
    pub investments: SectionSuggestion,

    #[serde(rename = "NPS (80CCD(1B))")]
    pub pension: SectionSuggestion,

    #[serde(rename = "Health Insurance (80D)")]
    pub health_insurance: SectionSuggestion,

    #[serde(rename = "General Advice")]
    pub general_advice: Vec<String>,
}

/// Tips sampled from one quick-tip category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickTips {
    pub section: String,
    pub tips: Vec<String>,
}

struct SectionPool {
    limit: i64,
    picks: usize,
    options: &'static [&'static str],
    limit_sentence: &'static str,
}

const INVESTMENTS: SectionPool = SectionPool {
    limit: 150_000,
    picks: 4,
    options: &[
        "Invest in ELSS Mutual Funds for high returns and tax savings",
        "Open a Public Provident Fund (PPF) account for long-term growth",
        "Buy Life Insurance policies for yourself or dependents",
        "Increase EPF contribution via Voluntary PF",
        "Invest in National Savings Certificate (NSC) through the post office",
        "Open a 5-year tax-saving Fixed Deposit (FD) in a bank",
        "Consider Sukanya Samriddhi Yojana (for girl child)",
        "Pay tuition fees for your children, eligible under Section 80C",
        "Repay home loan principal, also covered under Section 80C",
    ],
    limit_sentence: "You can claim up to ₹1,50,000 under Section 80C.",
};

const PENSION: SectionPool = SectionPool {
    limit: 50_000,
    picks: 3,
    options: &[
        "Contribute more to the National Pension System (NPS)",
        "Use NPS Tier I for long-term retirement corpus building",
        "Leverage employer contributions for additional tax benefit",
        "Opt for auto-choice investment in NPS for better diversification",
    ],
    limit_sentence: "You can save an extra ₹50,000 under Section 80CCD(1B).",
};

const HEALTH_INSURANCE: SectionPool = SectionPool {
    limit: 25_000,
    picks: 3,
    options: &[
        "Buy or renew health insurance for yourself and family",
        "Add preventive health check-ups to claim small deductions",
        "Get health insurance for parents (extra ₹25,000 to ₹50,000 deduction)",
        "Ensure health policy covers pre-existing diseases for long-term savings",
        "Opt for family floater plans to maximize 80D benefits",
    ],
    limit_sentence: "Total deduction limit: ₹25,000 (₹50,000 for senior citizens).",
};

const GENERAL_TIPS: &[&str] = &[
    "Consider switching to the New Regime if deductions are limited.",
    "Plan tax-saving investments early in the financial year.",
    "Track your 26AS and AIS reports to avoid mismatches while filing.",
    "File ITR early to prevent late fees and last-minute stress.",
    "Review your Form 16 and Form 26AS before submission.",
    "Opt for e-verification immediately after filing to complete the process.",
    "Use the Income Tax portal's comparison tool for regime selection.",
];

const GENERAL_TIP_PICKS: usize = 2;

const QUICK_TIPS: &[(&str, &[&str])] = &[
    ("80C (Investments)", &[
        "Invest in ELSS Mutual Funds for better long-term tax savings.",
        "Try a 5-year Tax Saving Fixed Deposit for secure returns.",
        "Buy a Life Insurance policy to save tax and protect your family.",
        "Consider Public Provident Fund (PPF) for safe and steady growth.",
        "You can also explore National Savings Certificate (NSC) via post office.",
    ]),
    ("80CCD(1B) (NPS Additional)", &[
        "Contribute extra ₹50,000 to NPS for additional tax benefits.",
        "Top-up your NPS account for better retirement planning.",
        "Don't miss the ₹50,000 extra deduction under Section 80CCD(1B).",
    ]),
    ("80D (Health Insurance)", &[
        "Pay health insurance premium for yourself and your parents.",
        "Opt for preventive health checkups to claim additional ₹5,000.",
        "Consider family floater insurance for wider coverage.",
    ]),
    ("80G (Donations)", &[
        "Donate to registered NGOs or PM Relief Fund to claim 50%-100% deduction.",
        "Support charitable organizations to save tax while making impact.",
    ]),
    ("80TTA (Savings Interest)", &[
        "Earn tax-free savings interest up to ₹10,000 under 80TTA.",
        "Maintain a healthy savings account for both returns and deductions.",
    ]),
];

fn sample<R: Rng + ?Sized>(rng: &mut R, pool: &[&str], k: usize) -> Vec<String> {
    pool.choose_multiple(rng, k.min(pool.len()))
        .map(|s| s.to_string())
        .collect()
}

impl SectionPool {
    fn suggest<R: Rng + ?Sized>(&self, claimed: i64, rng: &mut R) -> SectionSuggestion {
        let options = sample(rng, self.options, self.picks);
        let lead = self.options.choose(rng).copied().unwrap_or_default();

        SectionSuggestion {
            claimed,
            limit: self.limit,
            remaining: self.limit.saturating_sub(claimed.max(0)).max(0),
            options,
            note: format!("{}. {}", lead, self.limit_sentence),
        }
    }
}

/// Build the suggestion bundle for the claimed amounts.
pub fn generate_suggestions<R: Rng + ?Sized>(claimed: ClaimedSections, rng: &mut R) -> Suggestions {
    Suggestions {
        investments: INVESTMENTS.suggest(claimed.section_80c, rng),
        pension: PENSION.suggest(claimed.section_80ccd1b, rng),
        health_insurance: HEALTH_INSURANCE.suggest(claimed.section_80d, rng),
        general_advice: sample(rng, GENERAL_TIPS, GENERAL_TIP_PICKS),
    }
}

/// Up to `per_section` tips from each quick-tip category.
pub fn quick_tips<R: Rng + ?Sized>(per_section: usize, rng: &mut R) -> Vec<QuickTips> {
    QUICK_TIPS
        .iter()
        .map(|(section, pool)| QuickTips {
            section: section.to_string(),
            tips: sample(rng, pool, per_section),
        })
        .collect()
}
