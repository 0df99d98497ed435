//! Canonical deduction field names and their accepted spellings.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::record::FormData;

/// Closed set of canonical input keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalKey {
    Section80c,
    Section80ccd1b,
    /// Combined 80D figure; read as the self/family claim when no split is given.
    Section80d,
    Section80dSelf,
    Section80dParents,
    Section80e,
    Section80g,
    Section80tta,
    Section80eeb,
    /// Disability severity (0-100) of the taxpayer.
    DisabilitySelf,
    /// Disability severity (0-100) of a dependent.
    DisabilityDependent,
    TaxableIncome,
}

impl CanonicalKey {
    pub const ALL: [CanonicalKey; 12] = [
        CanonicalKey::Section80c,
        CanonicalKey::Section80ccd1b,
        CanonicalKey::Section80d,
        CanonicalKey::Section80dSelf,
        CanonicalKey::Section80dParents,
        CanonicalKey::Section80e,
        CanonicalKey::Section80g,
        CanonicalKey::Section80tta,
        CanonicalKey::Section80eeb,
        CanonicalKey::DisabilitySelf,
        CanonicalKey::DisabilityDependent,
        CanonicalKey::TaxableIncome,
    ];

    /// Field name in the transport schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalKey::Section80c => "section_80c",
            CanonicalKey::Section80ccd1b => "section_80ccd1b",
            CanonicalKey::Section80d => "section_80d",
            CanonicalKey::Section80dSelf => "section_80d_self",
            CanonicalKey::Section80dParents => "section_80d_parents",
            CanonicalKey::Section80e => "section_80e",
            CanonicalKey::Section80g => "section_80g",
            CanonicalKey::Section80tta => "section_80tta",
            CanonicalKey::Section80eeb => "section_80eeb",
            CanonicalKey::DisabilitySelf => "disability_self",
            CanonicalKey::DisabilityDependent => "disability_dependent",
            CanonicalKey::TaxableIncome => "taxable_income",
        }
    }

    /// Resolve any accepted spelling of a key.
    pub fn from_key(key: &str) -> Option<Self> {
        ALIASES.get(clean_key(key).as_str()).copied()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    /// Cleaned spelling -> canonical key.
    static ref ALIASES: HashMap<&'static str, CanonicalKey> = {
        use CanonicalKey::*;

        let table: &[(CanonicalKey, &[&str])] = &[
            (Section80c, &["sec80c", "section80c", "80c", "investments80c", "investments_80c"]),
            (Section80ccd1b, &[
                "sec80ccd1b", "section80ccd1b", "80ccd1b", "nps_additional", "npsadditional",
                "nps_add", "npsadd",
            ]),
            (Section80d, &["sec80d", "section80d", "80d"]),
            (Section80dSelf, &[
                "medical_self", "medicalself", "medinsuranceself", "80d_self", "section80d_self",
            ]),
            (Section80dParents, &[
                "medical_parents", "medicalparents", "medinsuranceparents", "80d_parents",
                "section80d_parents",
            ]),
            (Section80e, &[
                "sec80e", "section80e", "80e", "education_loan", "educationloan", "eduloan",
            ]),
            (Section80g, &["sec80g", "section80g", "80g", "donations", "donation"]),
            (Section80tta, &[
                "sec80tta", "section80tta", "80tta", "savings_interest", "savingsinterest",
            ]),
            (Section80eeb, &[
                "sec80eeb", "section80eeb", "80eeb", "ev_loan_interest", "evloaninterest",
                "ev_loan", "evloan",
            ]),
            (DisabilitySelf, &["selfdisability", "disabilityself", "80u"]),
            (DisabilityDependent, &["dependentdisability", "disabilitydependent", "80dd"]),
            (TaxableIncome, &["taxableincome"]),
        ];

        let mut aliases = HashMap::new();
        for key in CanonicalKey::ALL {
            aliases.insert(key.as_str(), key);
        }
        for (key, spellings) in table {
            for spelling in spellings.iter() {
                aliases.insert(*spelling, *key);
            }
        }
        aliases
    };
}

/// Lower-case and drop spaces, hyphens and parentheses. Underscores stay.
fn clean_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Rewrite known field spellings to their canonical names.
///
/// Unknown keys pass through verbatim. When several spellings of the same
/// key are present, the one already spelled canonically wins, otherwise the
/// first in key order. Normalizing twice changes nothing.
pub fn normalize_keys(input: &FormData) -> FormData {
    let mut normalized = FormData::new();

    for (key, value) in input {
        let Some(canonical) = CanonicalKey::from_key(key) else {
            normalized.entry(key.clone()).or_insert_with(|| value.clone());
            continue;
        };

        let name = canonical.as_str();
        if key == name {
            normalized.insert(name.to_string(), value.clone());
        } else if !normalized.contains_key(name) {
            normalized.insert(name.to_string(), value.clone());
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form(entries: &[(&str, serde_json::Value)]) -> FormData {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_spelling_variants() {
        assert_eq!(CanonicalKey::from_key("Sec80C"), Some(CanonicalKey::Section80c));
        assert_eq!(CanonicalKey::from_key("80CCD(1B)"), Some(CanonicalKey::Section80ccd1b));
        assert_eq!(CanonicalKey::from_key("medInsuranceParents"), Some(CanonicalKey::Section80dParents));
        assert_eq!(CanonicalKey::from_key("Taxable Income"), Some(CanonicalKey::TaxableIncome));
        assert_eq!(CanonicalKey::from_key("ev-loan"), Some(CanonicalKey::Section80eeb));
        assert_eq!(CanonicalKey::from_key("hra"), None);
    }

    #[test]
    fn test_canonical_names_resolve_to_themselves() {
        for key in CanonicalKey::ALL {
            assert_eq!(CanonicalKey::from_key(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_normalize_keys() {
        let normalized = normalize_keys(&form(&[("Sec80C", json!("5000"))]));
        assert_eq!(normalized, form(&[("section_80c", json!("5000"))]));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let input = form(&[("Home Rent", json!(12000)), ("nps_add", json!(1))]);
        let normalized = normalize_keys(&input);

        assert_eq!(normalized.get("Home Rent"), Some(&json!(12000)));
        assert_eq!(normalized.get("section_80ccd1b"), Some(&json!(1)));
    }

    #[test]
    fn test_canonical_spelling_wins_collisions() {
        let input = form(&[
            ("80C", json!("1")),
            ("section_80c", json!("2")),
            ("sec80c", json!("3")),
        ]);
        let normalized = normalize_keys(&input);

        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.get("section_80c"), Some(&json!("2")));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = form(&[
            ("Sec80C", json!("5000")),
            ("medical_self", json!(20000)),
            ("Donation", json!("1,000")),
            ("selfDisability", json!(45)),
            ("other", json!(null)),
        ]);
        let once = normalize_keys(&input);
        assert_eq!(normalize_keys(&once), once);
    }
}
