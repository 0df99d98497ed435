//! Core library for Form 16 salary statement processing.
//!
//! This crate provides:
//! - PDF text decoding (per-page text via lopdf and pdf-extract)
//! - Template detection and field extraction for the two known Form 16 layouts
//! - Normalization of user-supplied deduction field names
//! - Chapter VI-A deduction aggregation and old/new regime tax computation
//! - Seedable tax-saving suggestion sampling

pub mod error;
pub mod models;
pub mod pdf;
pub mod form16;
pub mod deductions;
pub mod tax;

pub use error::{Form16Error, PdfError, Result};
pub use models::config::Form16Config;
pub use models::record::{Form16Record, FormData, Regime, TaxRecord, NOT_FOUND};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use form16::{
    detect_layout, extract, DocumentLayout, ExtractionResult, Form16Extractor, Form16Parser,
};
pub use form16::rules::{clean_number, format_inr_amount};
pub use deductions::{
    aggregate_deductions, compare_regimes, normalize_keys, CanonicalKey, DeductionEngine,
    DeductionOutcome, DeductionRecord, RegimeComparison, Section,
};
pub use tax::{compute_tax, new_regime_tax, old_regime_tax, Suggestions, TaxCalculator, TaxSummary};
