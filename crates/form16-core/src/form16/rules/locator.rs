//! Line-oriented field locators.
//!
//! Labels and values usually share a rendered line, but section numbers and
//! formula markers often precede the value. The locators here pick the token
//! that matches the two known templates; "last number wins" misreads some
//! lines and is kept as-is until a labelled regression fixture says otherwise.

use regex::Regex;
use tracing::trace;

use super::numbers::{clean_number, last_integer_in_line};
use super::patterns::INTEGER_TOKEN;

/// Lines scanned by [`value_below_label`], counting the label line.
pub const LOOKAHEAD_LINES: usize = 4;

/// Tokens at or below this value are treated as page or section markers.
pub const NOISE_THRESHOLD: i64 = 100;

/// First line matching any of `labels`.
pub fn find_labeled_line<'t>(text: &'t str, labels: &[&Regex]) -> Option<&'t str> {
    text.lines().find(|line| labels.iter().any(|label| label.is_match(line)))
}

/// Last integer on the first line matching any of `labels`, or 0.
pub fn value_from_labeled_line(text: &str, labels: &[&Regex]) -> i64 {
    labeled_line_value(text, labels).unwrap_or(0)
}

/// Like [`value_from_labeled_line`], but `None` when no line matches or the
/// matching line carries no number. A printed zero is `Some(0)`.
pub fn labeled_line_value(text: &str, labels: &[&Regex]) -> Option<i64> {
    let line = find_labeled_line(text, labels)?;
    if !INTEGER_TOKEN.is_match(line) {
        return None;
    }
    let value = last_integer_in_line(line);
    trace!("labeled line {:?} -> {}", line.trim(), value);
    Some(value)
}

/// Amount printed at or below a label line.
///
/// For each line matching `label`, scans that line and the following lines
/// (up to [`LOOKAHEAD_LINES`] in total). Within a line tokens are read right
/// to left; the first one above [`NOISE_THRESHOLD`] wins.
pub fn value_below_label(text: &str, label: &Regex) -> i64 {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if !label.is_match(line) {
            continue;
        }

        let end = (i + LOOKAHEAD_LINES).min(lines.len());
        for candidate in &lines[i..end] {
            let tokens: Vec<&str> = INTEGER_TOKEN.find_iter(candidate).map(|m| m.as_str()).collect();
            for token in tokens.iter().rev() {
                let value = clean_number(*token);
                if value > NOISE_THRESHOLD {
                    trace!("value below {:?} -> {}", line.trim(), value);
                    return value;
                }
            }
        }
    }

    0
}

/// Two-phase lookup for values that may sit lines away from their label.
///
/// Finds a line matching `anchor`, then searches the rest of that line and
/// up to `window - 1` following lines for `value`, whose first capture group
/// holds the amount. Anchors are tried in document order.
pub fn amount_in_window(text: &str, anchor: &Regex, value: &Regex, window: usize) -> i64 {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let Some(m) = anchor.find(line) else {
            continue;
        };

        let end = (i + window.max(1)).min(lines.len());
        let mut region = String::from(&line[m.end()..]);
        for next in &lines[i + 1..end] {
            region.push('\n');
            region.push_str(next);
        }

        if let Some(caps) = value.captures(&region) {
            let amount = caps.get(1).map(|g| clean_number(g.as_str())).unwrap_or(0);
            trace!("window after {:?} -> {}", line.trim(), amount);
            return amount;
        }
    }

    0
}
