//! Template detection for the two known Form 16 layouts.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::patterns::{
    NEW_REGIME_FORM_TITLE, NEW_REGIME_MARKER, OLD_TAX_SLAB_MARKER, TAXABLE_INCOME_STATEMENT,
};
use crate::models::record::Regime;

/// Literal cue printed only on the new-regime template.
const TDS_NINE_PLUS_TEN: &str = "TDS (9+10)";

/// Literal cue used to break ties when no marker phrase is present.
const NET_TAX_FIVE_MINUS_SIX: &str = "NET TAX PAYABLE (5-6)";

/// Known Form 16 document templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentLayout {
    /// Statement issued under the new (alternate) regime.
    New,
    /// Statement of taxable income under the old tax slabs.
    Old,
}

impl DocumentLayout {
    /// Regime implied by the layout.
    pub fn regime(&self) -> Regime {
        match self {
            DocumentLayout::New => Regime::New,
            DocumentLayout::Old => Regime::Old,
        }
    }

    /// Parse a layout name ("new"/"old").
    pub fn parse(s: &str) -> Option<Self> {
        Regime::parse(s).map(|regime| match regime {
            Regime::New => DocumentLayout::New,
            Regime::Old => DocumentLayout::Old,
        })
    }
}

impl fmt::Display for DocumentLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regime().as_str())
    }
}

/// Which cue decided the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionCue {
    /// "FORM 16 (AS PER NEW REGIME)" title.
    NewRegimeTitle,
    /// A "NEW REGIME" phrase anywhere.
    NewRegimeMarker,
    /// The "TDS (9+10)" row.
    TdsNinePlusTen,
    /// "(Old Tax Slab)" marker.
    OldTaxSlab,
    /// "STATEMENT OF TAXABLE INCOME" heading.
    TaxableIncomeStatement,
    /// No marker; a "NET TAX PAYABLE (5-6)" row was present.
    NetTaxFiveMinusSix,
    /// No marker and no tie-breaker.
    Fallback,
    /// Layout supplied by the caller.
    Forced,
}

/// Outcome of layout detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub layout: DocumentLayout,
    pub cue: DetectionCue,
}

/// Classify document text into one of the two layouts.
///
/// Explicit new-regime markers are checked first, then old-layout markers,
/// then the "(5-6)" tie-breaker. Every input resolves to a layout.
pub fn detect(text: &str) -> Detection {
    let (layout, cue) = if NEW_REGIME_FORM_TITLE.is_match(text) {
        (DocumentLayout::New, DetectionCue::NewRegimeTitle)
    } else if NEW_REGIME_MARKER.is_match(text) {
        (DocumentLayout::New, DetectionCue::NewRegimeMarker)
    } else if text.contains(TDS_NINE_PLUS_TEN) {
        (DocumentLayout::New, DetectionCue::TdsNinePlusTen)
    } else if OLD_TAX_SLAB_MARKER.is_match(text) {
        (DocumentLayout::Old, DetectionCue::OldTaxSlab)
    } else if TAXABLE_INCOME_STATEMENT.is_match(text) {
        (DocumentLayout::Old, DetectionCue::TaxableIncomeStatement)
    } else if text.contains(NET_TAX_FIVE_MINUS_SIX) {
        (DocumentLayout::New, DetectionCue::NetTaxFiveMinusSix)
    } else {
        (DocumentLayout::Old, DetectionCue::Fallback)
    };

    debug!("Detected {} layout via {:?}", layout, cue);
    Detection { layout, cue }
}

/// Layout of the document text.
pub fn detect_layout(text: &str) -> DocumentLayout {
    detect(text).layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_regime_markers() {
        assert_eq!(
            detect("FORM 16 (As per New Regime)").cue,
            DetectionCue::NewRegimeTitle
        );
        assert_eq!(
            detect("Tax computed under the new regime u/s 115BAC").cue,
            DetectionCue::NewRegimeMarker
        );
    }

    #[test]
    fn test_tds_nine_plus_ten_selects_new() {
        let detection = detect("PART B\nTDS (9+10)     83,200");
        assert_eq!(detection.layout, DocumentLayout::New);
        assert_eq!(detection.cue, DetectionCue::TdsNinePlusTen);
    }

    #[test]
    fn test_new_markers_take_priority_over_old() {
        let text = "STATEMENT OF TAXABLE INCOME\nTDS (9+10) 1,000";
        assert_eq!(detect_layout(text), DocumentLayout::New);
    }

    #[test]
    fn test_old_markers() {
        assert_eq!(detect("SALARY STATEMENT (Old Tax Slab)").cue, DetectionCue::OldTaxSlab);
        assert_eq!(
            detect("statement of taxable income for 2024-25").cue,
            DetectionCue::TaxableIncomeStatement
        );
    }

    #[test]
    fn test_fallbacks() {
        let detection = detect("NET TAX PAYABLE (5-6) 12,000");
        assert_eq!(detection.layout, DocumentLayout::New);
        assert_eq!(detection.cue, DetectionCue::NetTaxFiveMinusSix);

        // The tie-breaker is case-sensitive.
        assert_eq!(detect_layout("net tax payable (5-6) 12,000"), DocumentLayout::Old);

        let detection = detect("");
        assert_eq!(detection.layout, DocumentLayout::Old);
        assert_eq!(detection.cue, DetectionCue::Fallback);
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!(DocumentLayout::parse("NEW"), Some(DocumentLayout::New));
        assert_eq!(DocumentLayout::New.regime(), Regime::New);
        assert_eq!(DocumentLayout::parse("other"), None);
    }
}
