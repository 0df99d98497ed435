//! Employee name and assessment year extraction.

use super::patterns::{
    AY_ABBREVIATED, AY_LINE_START, AY_PARENTHESIZED, COLUMN_GAP, EMPLOYER_EMPLOYEE_HEADER,
    NAME_BEFORE_POST, NAME_LINE, NAME_OF_EMPLOYEE, OFFICE_ROW,
};

/// Normalize an assessment year capture to `YYYY-YYYY`.
pub fn normalize_assessment_year(raw: &str) -> String {
    raw.replace(['–', '—'], "-")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Last column of a row whose columns are separated by two or more spaces.
fn last_column(row: &str) -> Option<String> {
    let columns: Vec<&str> = COLUMN_GAP.split(row.trim()).collect();
    if columns.len() >= 2 {
        columns.last().map(|c| c.trim().to_string())
    } else {
        None
    }
}

/// Employee name from the new layout.
///
/// The employer/employee header row is followed by a two-column row whose
/// last column is the employee. Falls back to a "Name of employee" label.
pub fn employee_name_new(text: &str) -> Option<String> {
    if let Some(name) = EMPLOYER_EMPLOYEE_HEADER
        .captures(text)
        .and_then(|caps| last_column(&caps[1]))
        .filter(|name| !name.is_empty())
    {
        return Some(name);
    }

    NAME_OF_EMPLOYEE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Employee name from the old layout.
///
/// Tries, in order: the two-column "OFFICE:-" row, a "<name> POST :-" line,
/// and a standalone "NAME :- <name>" line.
pub fn employee_name_old(text: &str) -> Option<String> {
    for line in text.lines() {
        if OFFICE_ROW.is_match(line) {
            if let Some(name) = last_column(line) {
                return Some(name);
            }
        }
    }

    for line in text.lines() {
        if let Some(caps) = NAME_BEFORE_POST.captures(line.trim()) {
            return Some(caps[1].trim().to_string());
        }
    }

    for line in text.lines() {
        if let Some(caps) = NAME_LINE.captures(line.trim()) {
            return Some(caps[1].trim().to_string());
        }
    }

    None
}

/// Assessment year from the new layout: "(AY 2025-2026)" first, then an
/// "ASSESS. YEAR" label.
pub fn assessment_year_new(text: &str) -> Option<String> {
    AY_PARENTHESIZED
        .captures(text)
        .or_else(|| AY_ABBREVIATED.captures(text))
        .map(|caps| normalize_assessment_year(&caps[1]))
}

/// Assessment year from the old layout: a line starting "ASSESSMENT YEAR:".
pub fn assessment_year_old(text: &str) -> Option<String> {
    text.lines()
        .find_map(|line| AY_LINE_START.captures(line.trim()))
        .map(|caps| normalize_assessment_year(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_assessment_year() {
        assert_eq!(normalize_assessment_year("2025 – 2026"), "2025-2026");
        assert_eq!(normalize_assessment_year("2024—2025"), "2024-2025");
    }

    #[test]
    fn test_employee_name_new_two_column() {
        let text = "\
NAME AND ADDRESS OF EMPLOYER      NAME AND ADDRESS OF EMPLOYEE
XYZ COMPANY PVT LTD               PRIYA SHARMA
MUMBAI                            PUNE";
        assert_eq!(employee_name_new(text), Some("PRIYA SHARMA".to_string()));
    }

    #[test]
    fn test_employee_name_new_fallback_label() {
        let text = "Name of Employee: Rahul K. Mehta\nPAN: ABCDE1234F";
        assert_eq!(employee_name_new(text), Some("Rahul K. Mehta".to_string()));
        assert_eq!(employee_name_new("nothing here"), None);
    }

    #[test]
    fn test_employee_name_old_variants() {
        let office = "OFFICE:- DISTRICT TREASURY      ANIL KUMAR";
        assert_eq!(employee_name_old(office), Some("ANIL KUMAR".to_string()));

        let post = "   SUNITA DEVI   POST :- ASST. MANAGER";
        assert_eq!(employee_name_old(post), Some("SUNITA DEVI".to_string()));

        let name = "NAME :- R. K. VERMA";
        assert_eq!(employee_name_old(name), Some("R. K. VERMA".to_string()));

        assert_eq!(employee_name_old("PAN :- ABCDE1234F"), None);
    }

    #[test]
    fn test_assessment_year() {
        assert_eq!(
            assessment_year_new("FORM 16 (AY 2025 – 2026)"),
            Some("2025-2026".to_string())
        );
        assert_eq!(
            assessment_year_new("ASSESS. YEAR : 2024-2025"),
            Some("2024-2025".to_string())
        );
        assert_eq!(
            assessment_year_old("  ASSESSMENT YEAR: 2024 - 2025\n"),
            Some("2024-2025".to_string())
        );
        assert_eq!(assessment_year_old("FOR ASSESSMENT YEAR: 2024-2025"), None);
    }
}
