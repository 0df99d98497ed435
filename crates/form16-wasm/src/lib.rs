//! WASM bindings for Form 16 extraction and income tax computation.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Maps cross the boundary as plain JS objects with snake_case keys.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use form16_core::models::record::split_review_fields;
use form16_core::pdf::{PdfExtractor, PdfProcessor};
use form16_core::{DocumentLayout, Form16Parser, Form16Record, FormData};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn form_from_js(value: JsValue) -> Result<FormData, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(FormData::new());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sampling source: seeded when a seed is given, else from `Math.random`.
fn rng_for(seed: Option<u32>) -> StdRng {
    let seed = match seed {
        Some(seed) => u64::from(seed),
        None => (js_sys::Math::random() * u32::MAX as f64) as u64,
    };
    StdRng::seed_from_u64(seed)
}

/// Build the record and deduction inputs from the two JS objects.
///
/// `record` holds extracted fields; `form` holds review edits (keys with a
/// `parsed_` prefix) and deduction inputs (everything else).
fn record_and_inputs(form: JsValue, record: JsValue) -> Result<(Form16Record, FormData), JsValue> {
    let mut parsed = Form16Record::default();
    parsed.apply_edits(&form_from_js(record)?);

    let (edits, inputs) = split_review_fields(&form_from_js(form)?);
    parsed.apply_edits(&edits);

    Ok((parsed, inputs))
}

fn layout_from_str(layout: Option<String>) -> Result<Option<DocumentLayout>, JsValue> {
    match layout {
        None => Ok(None),
        Some(name) => DocumentLayout::parse(&name)
            .map(Some)
            .ok_or_else(|| JsValue::from_str(&format!("unknown layout: {}", name))),
    }
}

/// Extract Form 16 fields from document text.
///
/// Never fails on content: unresolved fields keep their defaults.
#[wasm_bindgen]
pub fn extract_form16_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&form16_core::extract(text))
}

/// Extract Form 16 fields from PDF bytes.
#[wasm_bindgen]
pub fn extract_form16_from_pdf(data: &[u8]) -> Result<JsValue, JsValue> {
    let mut pdf = PdfExtractor::new();
    pdf.load(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let text = pdf.extract_text().map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_js(&Form16Parser::new().parse(&text))
}

/// Rewrite known deduction field spellings to canonical names.
#[wasm_bindgen]
pub fn normalize_keys(input: JsValue) -> Result<JsValue, JsValue> {
    to_js(&form16_core::normalize_keys(&form_from_js(input)?))
}

/// Aggregate deductions for the record's regime and compute tax.
#[wasm_bindgen]
pub fn compute_deductions(form: JsValue, record: JsValue, seed: Option<u32>) -> Result<JsValue, JsValue> {
    let (record, inputs) = record_and_inputs(form, record)?;
    let outcome = form16_core::aggregate_deductions(&inputs, &record, &mut rng_for(seed));
    to_js(&outcome)
}

/// Run both regimes over the same inputs and report the better one.
#[wasm_bindgen]
pub fn compare_regimes(form: JsValue, record: JsValue, seed: Option<u32>) -> Result<JsValue, JsValue> {
    let (record, inputs) = record_and_inputs(form, record)?;
    let comparison = form16_core::compare_regimes(&inputs, &record, &mut rng_for(seed));
    to_js(&comparison)
}

/// Tax summary from a field map holding an income field.
#[wasm_bindgen]
pub fn compute_tax(fields: JsValue, seed: Option<u32>) -> Result<JsValue, JsValue> {
    let summary = form16_core::compute_tax(&form_from_js(fields)?, &mut rng_for(seed));
    to_js(&summary)
}

/// Income from a JS number. NaN and negatives are 0; anything above the
/// largest whole-rupee amount, infinity included, is clamped to it.
fn income_from_f64(income: f64) -> Decimal {
    if income.is_nan() {
        return Decimal::ZERO;
    }
    let income = income.clamp(0.0, i64::MAX as f64);
    Decimal::from_f64(income).unwrap_or(Decimal::ZERO)
}

/// Old regime liability, including cess.
#[wasm_bindgen]
pub fn old_regime_tax(income: f64) -> f64 {
    form16_core::old_regime_tax(income_from_f64(income)) as f64
}

/// New regime liability, including cess.
#[wasm_bindgen]
pub fn new_regime_tax(income: f64) -> f64 {
    form16_core::new_regime_tax(income_from_f64(income)) as f64
}

/// Parse a locale-formatted amount such as "₹ 12,34,567".
#[wasm_bindgen]
pub fn clean_number(s: &str) -> f64 {
    form16_core::clean_number(s) as f64
}

/// Format an amount with lakh/crore grouping (12,34,567).
#[wasm_bindgen]
pub fn format_inr_amount(amount: f64) -> String {
    form16_core::format_inr_amount(amount.trunc() as i64)
}

/// Form 16 extractor class for browser use.
#[wasm_bindgen]
pub struct Form16Extractor {
    parser: Form16Parser,
}

#[wasm_bindgen]
impl Form16Extractor {
    /// Create a new extractor with layout detection.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: Form16Parser::new(),
        }
    }

    /// Force a layout ("old"/"new"), or restore detection with `undefined`.
    #[wasm_bindgen]
    pub fn set_layout(&mut self, layout: Option<String>) -> Result<(), JsValue> {
        let layout = layout_from_str(layout)?;
        self.parser = self.parser.clone().with_layout(layout);
        Ok(())
    }

    /// Extract the record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text).record)
    }

    /// Get extraction result with layout, warnings and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }
}

impl Default for Form16Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_clean_number() {
        assert_eq!(clean_number("₹ 12,34,567"), 1234567.0);
        assert_eq!(clean_number(""), 0.0);
    }

    #[wasm_bindgen_test]
    fn test_format_inr_amount() {
        assert_eq!(format_inr_amount(1234567.0), "12,34,567");
    }

    #[wasm_bindgen_test]
    fn test_regime_tax() {
        assert_eq!(old_regime_tax(500000.0), 0.0);
        assert_eq!(old_regime_tax(866058.0), 141140.0);
        assert_eq!(new_regime_tax(700000.0), 0.0);
    }

    #[wasm_bindgen_test]
    fn test_regime_tax_at_non_finite_and_huge_income() {
        assert_eq!(income_from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(income_from_f64(-1.0), Decimal::ZERO);
        assert_eq!(income_from_f64(f64::INFINITY), income_from_f64(1e40));

        assert_eq!(old_regime_tax(f64::NAN), 0.0);
        assert_eq!(old_regime_tax(f64::NEG_INFINITY), 0.0);
        assert!(old_regime_tax(f64::INFINITY) > 0.0);
        assert!(old_regime_tax(1e40) >= old_regime_tax(1e18));
        assert!(new_regime_tax(1e40) > 0.0);
        assert_eq!(new_regime_tax(f64::INFINITY), new_regime_tax(1e40));
    }

    #[wasm_bindgen_test]
    fn test_layout_from_str() {
        assert_eq!(layout_from_str(Some("new".to_string())).ok(), Some(Some(DocumentLayout::New)));
        assert!(layout_from_str(Some("sideways".to_string())).is_err());
    }

    #[wasm_bindgen_test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let a: u64 = rng_for(Some(9)).r#gen();
        let b: u64 = rng_for(Some(9)).r#gen();
        assert_eq!(a, b);
    }
}
