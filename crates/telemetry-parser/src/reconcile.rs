//! Column Header Reconciliation

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Matching key for a header: lowercase with everything outside `[a-z0-9]` removed
pub fn normalize_name(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Outcome of matching one canonical feature against the raw headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ColumnMatch {
    /// Raw header that carries this feature
    Matched(String),
    /// No raw header normalizes to this feature
    Unmatched,
}

impl ColumnMatch {
    /// Raw header, if matched
    pub fn header(&self) -> Option<&str> {
        match self {
            ColumnMatch::Matched(header) => Some(header),
            ColumnMatch::Unmatched => None,
        }
    }
}

/// Canonical feature -> raw header mapping, in canonical order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    entries: Vec<(String, ColumnMatch)>,
}

impl Reconciliation {
    /// Iterate entries in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnMatch)> {
        self.entries.iter().map(|(feature, m)| (feature.as_str(), m))
    }

    /// Match for a canonical feature
    pub fn get(&self, feature: &str) -> Option<&ColumnMatch> {
        self.entries
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, m)| m)
    }

    /// Number of canonical features in the mapping
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of features with a matching raw column
    pub fn matched_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, m)| matches!(m, ColumnMatch::Matched(_)))
            .count()
    }

    /// Canonical features with no matching raw column
    pub fn unmatched(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, m)| *m == ColumnMatch::Unmatched)
            .map(|(feature, _)| feature.as_str())
            .collect()
    }
}

/// Map each canonical feature onto the first raw header sharing its normalized name.
///
/// The canonical list drives the output: headers outside it are ignored and
/// every canonical feature appears exactly once.
pub fn reconcile<H, F>(raw_headers: &[H], canonical_features: &[F]) -> Reconciliation
where
    H: AsRef<str>,
    F: AsRef<str>,
{
    let mut lookup: HashMap<String, &str> = HashMap::with_capacity(raw_headers.len());
    for header in raw_headers {
        let key = normalize_name(header.as_ref());
        if key.is_empty() {
            continue;
        }
        // First occurrence wins
        lookup.entry(key).or_insert(header.as_ref());
    }

    let entries: Vec<(String, ColumnMatch)> = canonical_features
        .iter()
        .map(|feature| {
            let feature = feature.as_ref();
            let m = match lookup.get(&normalize_name(feature)) {
                Some(header) => ColumnMatch::Matched((*header).to_string()),
                None => ColumnMatch::Unmatched,
            };
            (feature.to_string(), m)
        })
        .collect();

    let reconciliation = Reconciliation { entries };
    debug!(
        "Reconciled {}/{} canonical features against {} raw headers",
        reconciliation.matched_count(),
        reconciliation.len(),
        raw_headers.len()
    );
    reconciliation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_units_and_punctuation() {
        assert_eq!(normalize_name("CPU Core [°C]"), "cpucorec");
        assert_eq!(normalize_name("cpu_core_C"), "cpucorec");
        assert_eq!(normalize_name("Total CPU Utility [%]"), "totalcpuutility");
        assert_eq!(normalize_name("Frame Time Presented (avg) [ms]"), "frametimepresentedavgms");
    }

    #[test]
    fn test_case_and_punctuation_insensitive_match() {
        let headers = ["Date", "cpu_core_C", "GPU Power [W]"];
        let canonical = ["CPU Core [°C]", "GPU Power [W]"];
        let result = reconcile(&headers, &canonical);

        assert_eq!(
            result.get("CPU Core [°C]"),
            Some(&ColumnMatch::Matched("cpu_core_C".to_string()))
        );
        assert_eq!(
            result.get("GPU Power [W]"),
            Some(&ColumnMatch::Matched("GPU Power [W]".to_string()))
        );
    }

    #[test]
    fn test_unmatched_features_reported() {
        let headers = ["Time", "Fan1 [RPM]"];
        let canonical = ["CPU Core [°C]", "Wear Level [%]"];
        let result = reconcile(&headers, &canonical);

        assert_eq!(result.matched_count(), 0);
        assert_eq!(result.unmatched(), vec!["CPU Core [°C]", "Wear Level [%]"]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let headers = ["GPU Power [W]", "gpu power (W)", "GPU-Power-W"];
        let canonical = ["GPU Power [W]"];
        let result = reconcile(&headers, &canonical);

        assert_eq!(result.get("GPU Power [W]").and_then(|m| m.header()), Some("GPU Power [W]"));
    }

    #[test]
    fn test_output_follows_canonical_order() {
        let headers = ["b", "a", "extra"];
        let canonical = ["A", "B", "C"];
        let result = reconcile(&headers, &canonical);

        let order: Vec<&str> = result.iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.get("C"), Some(&ColumnMatch::Unmatched));
        assert!(result.get("extra").is_none());
    }

    #[test]
    fn test_symbol_only_headers_never_match() {
        let headers = ["°", ""];
        let canonical = ["CPU Core [°C]"];
        let result = reconcile(&headers, &canonical);
        assert_eq!(result.matched_count(), 0);
    }
}
