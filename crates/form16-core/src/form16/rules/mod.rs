//! Rule-based field locators for Form 16 documents.

pub mod identity;
pub mod locator;
pub mod numbers;
pub mod patterns;

pub use identity::{
    assessment_year_new, assessment_year_old, employee_name_new, employee_name_old,
    normalize_assessment_year,
};
pub use locator::{
    amount_in_window, find_labeled_line, labeled_line_value, value_below_label,
    value_from_labeled_line, LOOKAHEAD_LINES, NOISE_THRESHOLD,
};
pub use numbers::{
    amount_from_value, clean_number, decimal_from_value, first_integer_after_label,
    format_amount, format_inr_amount, last_integer_in_line, last_signed_integer_in_line,
};

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text, `None` when it cannot be resolved.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// How a monetary field is located in document text.
#[derive(Debug, Clone)]
pub enum Locator {
    /// Last integer on the first line matching any of the labels.
    LabeledLine(Vec<&'static Regex>),

    /// First integer after the label on a matching line.
    FirstAfterLabel(&'static Regex),

    /// First plausible amount on or up to three lines below the label.
    BelowLabel(&'static Regex),

    /// Amount captured by `value` within `lines` lines of `anchor`.
    Window {
        anchor: &'static Regex,
        value: &'static Regex,
        lines: usize,
    },

    /// First locator that yields a non-zero amount.
    FirstOf(Vec<Locator>),

    /// Sum of the parts; a missing part counts as zero.
    Sum(Vec<Locator>),

    /// Overpayment on a signed balance line: a negative balance becomes a
    /// positive amount, a positive balance becomes zero.
    Overpayment(&'static Regex),
}

impl Locator {
    /// Resolve the amount, 0 when absent.
    pub fn locate(&self, text: &str) -> i64 {
        self.resolve(text).unwrap_or(0)
    }

    /// Resolve the amount, `None` when the field is absent.
    ///
    /// Labeled lines and balance lines that print a zero resolve to
    /// `Some(0)`; the scanning locators treat zero as absent.
    pub fn resolve(&self, text: &str) -> Option<i64> {
        let non_zero = |amount: &i64| *amount != 0;

        match self {
            Locator::LabeledLine(labels) => labeled_line_value(text, labels),
            Locator::FirstAfterLabel(label) => {
                Some(first_integer_after_label(label, text)).filter(non_zero)
            }
            Locator::BelowLabel(label) => Some(value_below_label(text, label)).filter(non_zero),
            Locator::Window { anchor, value, lines } => {
                Some(amount_in_window(text, anchor, value, *lines)).filter(non_zero)
            }
            Locator::FirstOf(candidates) => {
                let mut located_zero = false;
                for candidate in candidates {
                    match candidate.resolve(text) {
                        Some(0) => located_zero = true,
                        Some(amount) => return Some(amount),
                        None => {}
                    }
                }
                located_zero.then_some(0)
            }
            Locator::Sum(parts) => parts
                .iter()
                .filter_map(|part| part.resolve(text))
                .fold(None, |total: Option<i64>, amount| {
                    Some(total.unwrap_or(0).saturating_add(amount))
                }),
            Locator::Overpayment(label) => {
                let line = find_labeled_line(text, &[*label])?;
                let after = label.find(line).map(|m| &line[m.end()..]).unwrap_or(line);
                let without_markers = patterns::FORMULA_MARKER.replace_all(after, " ");
                if !patterns::SIGNED_INTEGER_TOKEN.is_match(&without_markers) {
                    return None;
                }
                let balance = last_signed_integer_in_line(&without_markers);
                Some(balance.saturating_neg().max(0))
            }
        }
    }
}

impl FieldExtractor for Locator {
    type Output = i64;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.resolve(text).map(|amount| amount.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref BALANCE: Regex = Regex::new(r"(?i)Balance\s+Tax\s+Payable\s*/\s*Refundable").unwrap();
        static ref JAN: Regex = Regex::new(r"(?i)JANUARY").unwrap();
        static ref FEB: Regex = Regex::new(r"(?i)FEBRUARY").unwrap();
        static ref TDS: Regex = Regex::new(r"(?i)TDS\s*\(9\+10\)").unwrap();
    }

    #[test]
    fn test_overpayment_refund() {
        let refund = Locator::Overpayment(&*BALANCE);

        assert_eq!(refund.locate("Balance Tax Payable / Refundable (17 - 18) Rs. -5000"), 5000);
        assert_eq!(refund.locate("Balance Tax Payable / Refundable (17-18) Rs. 3000"), 0);
        assert_eq!(refund.locate("Balance Tax Payable / Refundable (17-18)"), 0);
        assert_eq!(refund.locate("no balance line"), 0);

        assert_eq!(refund.extract("Balance Tax Payable / Refundable (17-18) Rs. 3000"), Some(0));
        assert_eq!(refund.extract("Balance Tax Payable / Refundable (17-18)"), None);
    }

    #[test]
    fn test_overpayment_at_i64_min_saturates() {
        let refund = Locator::Overpayment(&*BALANCE);

        assert_eq!(
            refund.locate("Balance Tax Payable / Refundable (17 - 18) Rs. -9223372036854775808"),
            i64::MAX
        );
    }

    #[test]
    fn test_sum_saturates() {
        let monthly = Locator::Sum(vec![
            Locator::LabeledLine(vec![&*JAN]),
            Locator::LabeledLine(vec![&*FEB]),
        ]);

        let text = "JANUARY 9223372036854775807\nFEBRUARY 9223372036854775807";
        assert_eq!(monthly.locate(text), i64::MAX);
        assert_eq!(monthly.extract("nothing"), None);
        assert_eq!(monthly.extract("JANUARY 0"), Some(0));
    }

    #[test]
    fn test_first_of_keeps_located_zero() {
        let tds = Locator::FirstOf(vec![
            Locator::LabeledLine(vec![&*TDS]),
            Locator::LabeledLine(vec![&*JAN]),
        ]);

        assert_eq!(tds.extract("TDS (9+10) 0\nJANUARY 10,000"), Some(10000));
        assert_eq!(tds.extract("TDS (9+10) 0"), Some(0));
        assert_eq!(tds.extract("TDS (9+10)"), None);
    }

    #[test]
    fn test_first_of_falls_through_to_sum() {
        let tds = Locator::FirstOf(vec![
            Locator::LabeledLine(vec![&*TDS]),
            Locator::Sum(vec![
                Locator::LabeledLine(vec![&*JAN]),
                Locator::LabeledLine(vec![&*FEB]),
            ]),
        ]);

        assert_eq!(tds.locate("JANUARY 10,000\nFEBRUARY 12,500"), 22500);
        assert_eq!(tds.locate("JANUARY 10,000"), 10000);
        assert_eq!(tds.locate("TDS (9+10) 99,000\nJANUARY 10,000"), 99000);
        assert_eq!(tds.extract("nothing"), None);
    }
}
