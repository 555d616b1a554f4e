//! Numeric Extraction from Noisy Cells

use regex::Regex;
use std::sync::OnceLock;

/// First signed integer or decimal literal anywhere in the text
fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("numeric pattern is valid"))
}

/// Extract the first number embedded in a cell.
///
/// Returns `None` ("no value") for empty text, text without any digits, or a
/// literal that does not parse to a finite `f64`. Malformed cells are common in
/// exported logs, so this never fails.
pub fn extract_numeric(raw: &str) -> Option<f64> {
    let literal = numeric_pattern().find(raw)?;
    literal
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Extract every cell of a column, keeping "no value" entries in place
pub fn extract_column<S: AsRef<str>>(cells: &[S]) -> Vec<Option<f64>> {
    cells.iter().map(|cell| extract_numeric(cell.as_ref())).collect()
}
