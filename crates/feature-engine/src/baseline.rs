//! Healthy Baseline Profile

use crate::schema::FeatureSchema;
use crate::statistics::ColumnStatistics;
use serde::ser::{Serialize, SerializeMap, Serializer};
use telemetry_parser::{extract_column, RawTable};
use tracing::{info, warn};

/// Per-feature mean of a known-healthy reference dataset.
///
/// Built once at startup and shared read-only. Features the reference data
/// does not track are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineProfile {
    entries: Vec<(String, Option<f64>)>,
}

impl BaselineProfile {
    /// Build the profile from a reference table.
    ///
    /// Reference columns are looked up by their exact canonical header.
    pub fn build(reference: &RawTable, schema: &FeatureSchema) -> Self {
        let entries: Vec<(String, Option<f64>)> = schema
            .names()
            .iter()
            .map(|feature| {
                let mean = reference
                    .column(feature)
                    .and_then(|cells| ColumnStatistics::compute(&extract_column(cells)).mean);
                (feature.clone(), mean)
            })
            .collect();

        let profile = Self { entries };
        let untracked = profile.untracked();
        if !untracked.is_empty() {
            warn!("Baseline does not track: {}", untracked.join(", "));
        }
        info!(
            "Baseline built from {} reference rows: {}/{} features tracked",
            reference.row_count(),
            profile.tracked_count(),
            schema.len()
        );
        profile
    }

    /// Profile from explicit `(feature, value)` pairs
    pub fn from_values<S: Into<String>>(values: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            entries: values
                .into_iter()
                .map(|(name, value)| (name.into(), Some(value)))
                .collect(),
        }
    }

    /// Baseline value of a feature, `None` when untracked
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == feature)
            .and_then(|(_, value)| *value)
    }

    /// Tracked features in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.map(|v| (name.as_str(), v)))
    }

    /// Number of tracked features
    pub fn tracked_count(&self) -> usize {
        self.iter().count()
    }

    /// Schema features without a baseline value
    pub fn untracked(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl Serialize for BaselineProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tracked_count()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Build the baseline profile for a reference table
pub fn build_baseline(reference: &RawTable, schema: &FeatureSchema) -> BaselineProfile {
    BaselineProfile::build(reference, schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> RawTable {
        RawTable::from_rows(
            ["Time", "CPU Core [°C]", "GPU Power [W]", "Wear Level [%]"],
            vec![
                vec!["0".into(), "50 °C".into(), "10".into(), "".into()],
                vec!["1".into(), "60".into(), "n/a".into(), "".into()],
            ],
        )
    }

    #[test]
    fn test_means_of_present_columns() {
        let schema = FeatureSchema::new(["CPU Core [°C]", "GPU Power [W]"]);
        let profile = build_baseline(&reference(), &schema);

        assert_eq!(profile.get("CPU Core [°C]"), Some(55.0));
        assert_eq!(profile.get("GPU Power [W]"), Some(10.0));
        assert_eq!(profile.tracked_count(), 2);
    }

    #[test]
    fn test_missing_columns_are_absent_not_zero() {
        let profile = build_baseline(&reference(), &FeatureSchema::canonical());

        assert_eq!(profile.get("GPU Temperature [°C]"), None);
        assert_eq!(profile.get("Wear Level [%]"), None);
        assert!(profile.untracked().contains(&"GPU Temperature [°C]"));
        assert_eq!(profile.tracked_count(), 2);
    }

    #[test]
    fn test_iter_follows_schema_order() {
        let profile = build_baseline(&reference(), &FeatureSchema::canonical());
        let names: Vec<&str> = profile.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["CPU Core [°C]", "GPU Power [W]"]);
    }

    #[test]
    fn test_exact_header_wins_over_variant() {
        let reference = RawTable::from_rows(
            ["cpu core (C)", "CPU Core [°C]"],
            vec![vec!["10".into(), "50".into()]],
        );
        let schema = FeatureSchema::new(["CPU Core [°C]"]);
        assert_eq!(build_baseline(&reference, &schema).get("CPU Core [°C]"), Some(50.0));
    }

    #[test]
    fn test_variant_header_is_not_tracked() {
        let reference = RawTable::from_rows(["cpu core (C)"], vec![vec!["10".into()]]);
        let schema = FeatureSchema::new(["CPU Core [°C]"]);
        let profile = build_baseline(&reference, &schema);

        assert_eq!(profile.get("CPU Core [°C]"), None);
        assert_eq!(profile.untracked(), vec!["CPU Core [°C]"]);
    }

    #[test]
    fn test_from_values() {
        let profile = BaselineProfile::from_values([("X", 50.0)]);
        assert_eq!(profile.get("X"), Some(50.0));
        assert_eq!(profile.get("Y"), None);
    }
}
