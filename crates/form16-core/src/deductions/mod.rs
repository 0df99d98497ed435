//! Deduction input normalization and aggregation.

pub mod engine;
pub mod keys;
pub mod sections;

pub use engine::{
    aggregate_deductions, compare_regimes, DeductionEngine, DeductionOutcome, DeductionRecord,
    RegimeComparison, SectionClaim,
};
pub use keys::{normalize_keys, CanonicalKey};
pub use sections::{disability_amount, Section};
