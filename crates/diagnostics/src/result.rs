//! Diagnostic Result Assembly

use crate::deviation::DeviationNote;
use chrono::{DateTime, Utc};
use feature_engine::{BaselineProfile, FeatureVector};
use inference_engine::Label;
use serde::Serialize;
use uuid::Uuid;

/// Line shown instead of notes when nothing deviates
pub const HEALTHY_FALLBACK_NOTE: &str = "All metrics are within healthy ranges.";

/// Features compared side by side in the report chart
pub const CHART_FEATURES: [&str; 4] = [
    "CPU Core [°C]",
    "GPU Temperature [°C]",
    "Physical Memory Load [%]",
    "GPU Utilization [%]",
];

/// Baseline vs observed value of one charted feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub feature: &'static str,
    pub baseline: Option<f64>,
    pub observed: f64,
}

/// Immutable outcome of diagnosing one uploaded log
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticResult {
    id: Uuid,
    generated_at: DateTime<Utc>,
    label: Label,
    feature_values: FeatureVector,
    baseline_values: BaselineProfile,
    notes: Vec<DeviationNote>,
}

impl DiagnosticResult {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn feature_values(&self) -> &FeatureVector {
        &self.feature_values
    }

    pub fn baseline_values(&self) -> &BaselineProfile {
        &self.baseline_values
    }

    pub fn notes(&self) -> &[DeviationNote] {
        &self.notes
    }

    /// Verdict sentence for the report title area
    pub fn headline(&self) -> &'static str {
        self.label.headline()
    }

    /// Note messages, or the healthy fallback line when there are none
    pub fn note_lines(&self) -> Vec<String> {
        if self.notes.is_empty() {
            vec![HEALTHY_FALLBACK_NOTE.to_string()]
        } else {
            self.notes.iter().map(ToString::to_string).collect()
        }
    }

    /// `"<feature>: <value>"` lines with two decimals, in schema order
    pub fn key_metrics(&self) -> Vec<String> {
        self.feature_values
            .iter()
            .map(|f| format!("{}: {:.2}", f.name, f.value))
            .collect()
    }

    /// Values for the baseline vs observed comparison chart
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        CHART_FEATURES
            .iter()
            .map(|&feature| ChartPoint {
                feature,
                baseline: self.baseline_values.get(feature),
                observed: self.feature_values.get(feature).unwrap_or(0.0),
            })
            .collect()
    }
}

/// Combine the pipeline outputs into one snapshot
pub fn assemble(
    label: Label,
    vector: FeatureVector,
    baseline: BaselineProfile,
    notes: Vec<DeviationNote>,
) -> DiagnosticResult {
    DiagnosticResult {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        label,
        feature_values: vector,
        baseline_values: baseline,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(feature: &str) -> DeviationNote {
        DeviationNote {
            feature: feature.to_string(),
            baseline_value: 50.0,
            observed_value: 60.0,
            relative_deviation: 0.2,
        }
    }

    #[test]
    fn test_fallback_note_when_no_deviation() {
        let result = assemble(
            Label::Healthy,
            FeatureVector::from_entries([("CPU Core [°C]", 50.0)]),
            BaselineProfile::from_values([("CPU Core [°C]", 50.0)]),
            Vec::new(),
        );

        assert_eq!(result.headline(), "Your laptop appears to be Healthy!");
        assert_eq!(result.note_lines(), vec![HEALTHY_FALLBACK_NOTE.to_string()]);
        assert!(result.notes().is_empty());
    }

    #[test]
    fn test_note_lines_and_key_metrics() {
        let result = assemble(
            Label::Abnormal,
            FeatureVector::from_entries([("CPU Core [°C]", 60.0), ("GPU Power [W]", 12.346)]),
            BaselineProfile::from_values([("CPU Core [°C]", 50.0)]),
            vec![note("CPU Core [°C]")],
        );

        assert_eq!(
            result.note_lines(),
            vec!["CPU Core [°C] deviates from healthy value (50.00). Current: 60.00".to_string()]
        );
        assert_eq!(
            result.key_metrics(),
            vec!["CPU Core [°C]: 60.00".to_string(), "GPU Power [W]: 12.35".to_string()]
        );
    }

    #[test]
    fn test_chart_series_handles_missing_values() {
        let result = assemble(
            Label::Healthy,
            FeatureVector::from_entries([("CPU Core [°C]", 60.0)]),
            BaselineProfile::from_values([("GPU Temperature [°C]", 55.0)]),
            Vec::new(),
        );

        let series = result.chart_series();
        assert_eq!(series.len(), CHART_FEATURES.len());
        assert_eq!(series[0].observed, 60.0);
        assert_eq!(series[0].baseline, None);
        assert_eq!(series[1].baseline, Some(55.0));
        assert_eq!(series[1].observed, 0.0);
    }

    #[test]
    fn test_serialized_shape() {
        let result = assemble(
            Label::Abnormal,
            FeatureVector::from_entries([("CPU Core [°C]", 60.0)]),
            BaselineProfile::from_values([("CPU Core [°C]", 50.0)]),
            vec![note("CPU Core [°C]")],
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["label"], "abnormal");
        assert_eq!(json["feature_values"]["CPU Core [°C]"], 60.0);
        assert_eq!(json["baseline_values"]["CPU Core [°C]"], 50.0);
        assert_eq!(json["notes"][0]["feature"], "CPU Core [°C]");
        assert!(json["id"].is_string());
    }
}
