//! Numeric cleaning for locale-formatted amounts.
//!
//! Every function here is total: malformed input yields zero, never an error.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use regex::Regex;
use serde_json::Value;
use std::num::IntErrorKind;
use std::str::FromStr;

use super::patterns::{INTEGER_TOKEN, SIGNED_INTEGER, SIGNED_INTEGER_TOKEN};

/// Strip thousands separators, the rupee glyph and Unicode minus signs.
fn strip_formatting(s: &str) -> String {
    s.replace(',', "")
        .replace('₹', "")
        .replace('\u{2212}', "-")
        .trim()
        .to_string()
}

/// Convert a numeric-looking string such as `"1,23,456"` or `"₹ 50,000"` to
/// an integer.
///
/// Takes the first signed integer after removing separators and the currency
/// glyph. Empty, missing or non-numeric input gives 0. Digit runs beyond the
/// `i64` range saturate.
pub fn clean_number<'a>(s: impl Into<Option<&'a str>>) -> i64 {
    let Some(s) = s.into() else {
        return 0;
    };

    let cleaned = strip_formatting(s);
    SIGNED_INTEGER
        .find(&cleaned)
        .and_then(|m| parse_saturating(m.as_str()))
        .unwrap_or(0)
}

/// Parse a signed integer, clamping out-of-range values to the `i64` bounds.
fn parse_saturating(digits: &str) -> Option<i64> {
    match digits.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Last comma-grouped integer token on a line, or 0.
pub fn last_integer_in_line(line: &str) -> i64 {
    INTEGER_TOKEN
        .find_iter(line)
        .last()
        .map(|m| clean_number(m.as_str()))
        .unwrap_or(0)
}

/// Like [`last_integer_in_line`] but keeps a leading minus sign.
pub fn last_signed_integer_in_line(line: &str) -> i64 {
    SIGNED_INTEGER_TOKEN
        .find_iter(line)
        .last()
        .map(|m| clean_number(m.as_str()))
        .unwrap_or(0)
}

/// First integer that follows `label` on a matching line.
///
/// Lines are scanned in order. A matching line with no integer after the
/// label does not stop the scan; the next matching line is tried.
pub fn first_integer_after_label(label: &Regex, text: &str) -> i64 {
    for line in text.lines() {
        if let Some(m) = label.find(line) {
            if let Some(token) = INTEGER_TOKEN.find(&line[m.end()..]) {
                return clean_number(token.as_str());
            }
        }
    }
    0
}

/// Interpret a user-entered value as a whole amount.
///
/// Numbers are truncated; strings are cleaned of separators and the currency
/// glyph first. Anything else, including non-numeric text, is 0.
pub fn amount_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let cleaned = strip_formatting(s);
            if cleaned.is_empty() {
                return 0;
            }
            parse_saturating(&cleaned)
                .or_else(|| {
                    cleaned
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Interpret a user-entered value as a decimal amount.
///
/// Returns `None` for null, empty or non-numeric values so callers can fall
/// through to the next candidate key.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Decimal::from(i)),
            None => n.as_f64().and_then(Decimal::from_f64),
        },
        Value::String(s) => {
            let cleaned = strip_formatting(s);
            if cleaned.is_empty() {
                return None;
            }
            Decimal::from_str(&cleaned)
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().and_then(Decimal::from_f64))
        }
        _ => None,
    }
}

/// Format an amount with Indian digit grouping (12,34,567).
pub fn format_inr_amount(amount: i64) -> String {
    format_amount(amount, true)
}

/// Format an amount with either Indian (lakh/crore) or western thousands
/// grouping.
pub fn format_amount(amount: i64, indian_grouping: bool) -> String {
    let digits = amount.unsigned_abs().to_string();
    let chars: Vec<char> = digits.chars().collect();
    let len = chars.len();
    let mut formatted = String::with_capacity(len + len / 2 + 1);

    for (i, c) in chars.iter().enumerate() {
        let remaining = len - i;
        let separator = if indian_grouping {
            remaining > 3 && i > 0 && (remaining - 3) % 2 == 0
                || remaining == 3 && i > 0
        } else {
            i > 0 && remaining % 3 == 0
        };
        if separator {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    if amount < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    #[test]
    fn test_clean_number() {
        assert_eq!(clean_number("₹ 12,34,567"), 1234567);
        assert_eq!(clean_number("Rs. 50,000 only"), 50000);
        assert_eq!(clean_number("-5,000"), -5000);
        assert_eq!(clean_number(""), 0);
        assert_eq!(clean_number(None), 0);
        assert_eq!(clean_number("n/a"), 0);
    }

    #[test]
    fn test_last_integer_in_line() {
        assert_eq!(last_integer_in_line("Standard Deduction u/s 16(ia) 50,000"), 50000);
        assert_eq!(last_integer_in_line("no digits here"), 0);
        assert_eq!(last_integer_in_line("Balance (17 - 18) Rs. -5000"), 5000);
    }

    #[test]
    fn test_last_signed_integer_in_line() {
        assert_eq!(last_signed_integer_in_line("Balance Rs. -5,000"), -5000);
        assert_eq!(last_signed_integer_in_line("Balance Rs. 3000"), 3000);
    }

    #[test]
    fn test_first_integer_after_label() {
        let label = Regex::new(r"(?i)Total\s+Tax\s+Payable").unwrap();
        let text = "12 Total Tax Payable\n13 Total Tax Payable (10+11) 1,41,140 0";

        // The first matching line has nothing after the label.
        assert_eq!(first_integer_after_label(&label, text), 10);
        assert_eq!(first_integer_after_label(&label, "Total Tax Payable Rs. 2,500 9"), 2500);
        assert_eq!(first_integer_after_label(&label, "unrelated 123"), 0);
    }

    #[test]
    fn test_amount_from_value() {
        assert_eq!(amount_from_value(&json!("1,50,000")), 150000);
        assert_eq!(amount_from_value(&json!("₹ 2,000")), 2000);
        assert_eq!(amount_from_value(&json!(12.9)), 12);
        assert_eq!(amount_from_value(&json!("12.9")), 12);
        assert_eq!(amount_from_value(&json!("twelve")), 0);
        assert_eq!(amount_from_value(&json!("")), 0);
        assert_eq!(amount_from_value(&json!(null)), 0);
        assert_eq!(amount_from_value(&json!(true)), 0);
    }

    #[test]
    fn test_out_of_range_amounts_saturate() {
        assert_eq!(clean_number("9223372036854775807"), i64::MAX);
        assert_eq!(clean_number("99,99,99,99,99,99,99,99,99,999"), i64::MAX);
        assert_eq!(clean_number("-9223372036854775809"), i64::MIN);
        assert_eq!(last_integer_in_line("Total 123456789012345678901234567890"), i64::MAX);

        assert_eq!(amount_from_value(&json!("9223372036854775807")), i64::MAX);
        assert_eq!(amount_from_value(&json!("123456789012345678901234567890")), i64::MAX);
        assert_eq!(amount_from_value(&json!(1e300)), i64::MAX);
        assert_eq!(amount_from_value(&json!(u64::MAX)), i64::MAX);
    }

    #[test]
    fn test_decimal_from_value() {
        assert_eq!(decimal_from_value(&json!("8,66,058")), Some(Decimal::from(866058)));
        assert_eq!(decimal_from_value(&json!("")), None);
        assert_eq!(decimal_from_value(&json!("abc")), None);
        assert_eq!(decimal_from_value(&json!(null)), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_inr_amount(1234567), "12,34,567");
        assert_eq!(format_inr_amount(150000), "1,50,000");
        assert_eq!(format_inr_amount(999), "999");
        assert_eq!(format_inr_amount(-5000), "-5,000");
        assert_eq!(format_amount(1234567, false), "1,234,567");
        assert_eq!(format_amount(0, false), "0");
    }
}
