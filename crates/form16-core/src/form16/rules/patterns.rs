//! Common regex patterns for Form 16 extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric tokens
    pub static ref SIGNED_INTEGER: Regex = Regex::new(r"-?[0-9]+").unwrap();

    pub static ref INTEGER_TOKEN: Regex = Regex::new(r"[0-9][0-9,]*").unwrap();

    pub static ref SIGNED_INTEGER_TOKEN: Regex = Regex::new(r"-?[0-9][0-9,]*").unwrap();

    /// Column gap in two-column header rows.
    pub static ref COLUMN_GAP: Regex = Regex::new(r"\s{2,}").unwrap();

    /// Computation markers such as "(17 - 18)" that precede the real value.
    pub static ref FORMULA_MARKER: Regex = Regex::new(r"\(\s*[0-9]+\s*[-+]\s*[0-9]+\s*\)").unwrap();

    // Layout detection
    pub static ref NEW_REGIME_FORM_TITLE: Regex = Regex::new(
        r"(?i)FORM\s*16\s*\(AS\s*PER\s*NEW\s*REGIME\)"
    ).unwrap();

    pub static ref NEW_REGIME_MARKER: Regex = Regex::new(r"(?i)\bNEW\s+REGIME\b").unwrap();

    pub static ref OLD_TAX_SLAB_MARKER: Regex = Regex::new(r"(?i)\(Old\s*Tax\s*Slab\)").unwrap();

    pub static ref TAXABLE_INCOME_STATEMENT: Regex = Regex::new(
        r"(?i)STATEMENT\s+OF\s+TAXABLE\s+INCOME"
    ).unwrap();

    // Assessment year
    pub static ref AY_PARENTHESIZED: Regex = Regex::new(
        r"(?i)\(AY\s*([0-9]{4}\s*[–—-]\s*[0-9]{4})\)"
    ).unwrap();

    pub static ref AY_ABBREVIATED: Regex = Regex::new(
        r"(?i)ASSESS\.?\s*YEAR\s*[:\-]?\s*([0-9]{4}\s*[–—-]\s*[0-9]{4})"
    ).unwrap();

    pub static ref AY_LINE_START: Regex = Regex::new(
        r"(?i)^ASSESSMENT\s+YEAR\s*[:\-]\s*([0-9]{4}\s*[–—-]\s*[0-9]{4})"
    ).unwrap();

    // Employee name, new layout
    pub static ref EMPLOYER_EMPLOYEE_HEADER: Regex = Regex::new(
        r"(?i)NAME\s+AND\s+ADDRESS\s+OF\s+EMPLOYER.*?NAME\s+AND\s+ADDRESS\s+OF\s+EMPLOYEE.*?\n([^\n]+)"
    ).unwrap();

    pub static ref NAME_OF_EMPLOYEE: Regex = Regex::new(
        r"(?i)NAME\s+OF\s+EMPLOYEE\s*[:\-]?\s*([A-Z][A-Za-z .]+)"
    ).unwrap();

    // Employee name, old layout
    pub static ref OFFICE_ROW: Regex = Regex::new(r"(?i)OFFICE\s*:-").unwrap();

    pub static ref NAME_BEFORE_POST: Regex = Regex::new(
        r"^\s*([A-Z][A-Za-z .]+)\s+POST\s*:-"
    ).unwrap();

    pub static ref NAME_LINE: Regex = Regex::new(
        r"(?i)^NAME\s*[:\-]+\s*([A-Za-z .]+)$"
    ).unwrap();

    // New layout amounts
    pub static ref NEW_GROSS_SALARY: Regex = Regex::new(r"(?i)\bGROSS\s+SALARY\b").unwrap();

    pub static ref NEW_STANDARD_DEDUCTION: Regex = Regex::new(r"(?i)Standard\s+Deduction").unwrap();

    pub static ref NEW_TAXABLE_INCOME: Regex = Regex::new(r"(?i)TOTAL\s+CHARGE?ABLE\s+INCOME").unwrap();

    pub static ref NET_TAX_ROUNDED: Regex = Regex::new(
        r"(?i)NET\s+TAX\s+PAYABLE\s*\(in\s*round\s*figure\)"
    ).unwrap();

    pub static ref NET_TAX_5_MINUS_6: Regex = Regex::new(r"(?i)NET\s+TAX\s+PAYABLE\s*\(5-6\)").unwrap();

    pub static ref TAX_PAYABLE_3_PLUS_4: Regex = Regex::new(r"(?i)TAX\s+PAYABLE\s*\(3\+4\)").unwrap();

    pub static ref TDS_9_PLUS_10: Regex = Regex::new(r"(?i)TDS\s*\(9\+10\)").unwrap();

    pub static ref TDS_COMPANY_TOTAL: Regex = Regex::new(
        r"(?i)TOTAL\s+TAX\s+DEDUCTED.*XYZ\s+COMPANY"
    ).unwrap();

    pub static ref TDS_JANUARY: Regex = Regex::new(r"(?i)JANUARY\s+NEXT\s+YEAR.*\(TDS\)").unwrap();

    pub static ref TDS_FEBRUARY: Regex = Regex::new(r"(?i)FEBRUARY\s+NEXT\s+YEAR.*\(TDS\)").unwrap();

    pub static ref NEW_REFUND: Regex = Regex::new(r"(?i)\bREFUND\b").unwrap();

    // Old layout amounts
    pub static ref OLD_GROSS_SALARY: Regex = Regex::new(r"(?i)1\s+GROSS\s+SALARY").unwrap();

    pub static ref TOTAL_RS_AMOUNT: Regex = Regex::new(r"(?i)Total\s+Rs\.\s*([0-9][0-9,]*)").unwrap();

    pub static ref OLD_STANDARD_DEDUCTION: Regex = Regex::new(
        r"(?i)New\s+Standard\s+Deductions?"
    ).unwrap();

    pub static ref SALARY_HEAD_INCOME: Regex = Regex::new(
        r"(?i)Income\s+charg[ea]ble\s+under\s+the\s+head\s+salaries"
    ).unwrap();

    pub static ref RS_AMOUNT: Regex = Regex::new(r"(?i)Rs\.\s*([0-9][0-9,]*)").unwrap();

    pub static ref LESS_TDS: Regex = Regex::new(
        r"(?i)Less.*?Tax\s+Deducted\s+at\s+Source"
    ).unwrap();

    pub static ref OLD_TOTAL_TAX_PAYABLE: Regex = Regex::new(r"(?i)Total\s+Tax\s+Payable").unwrap();

    pub static ref BALANCE_PAYABLE_REFUNDABLE: Regex = Regex::new(
        r"(?i)Balance\s+Tax\s+Payable\s*/\s*Refundable"
    ).unwrap();
}
