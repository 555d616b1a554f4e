//! Per-Upload Diagnostic Pipeline

use crate::deviation::{DeviationAnalyzer, DeviationConfig};
use crate::result::{assemble, DiagnosticResult};
use crate::DiagnosticError;
use feature_engine::{BaselineProfile, FeatureSchema, FeatureVectorBuilder};
use inference_engine::ClassifierAdapter;
use std::sync::Arc;
use telemetry_parser::{RawTable, TableReader};
use tracing::{debug, info};

/// Runs reconcile -> extract -> build -> {analyze, classify} -> assemble.
///
/// Holds the process-wide baseline and classifier by shared reference; each
/// call works only on request-local data.
pub struct Diagnostician {
    builder: FeatureVectorBuilder,
    analyzer: DeviationAnalyzer,
    baseline: Arc<BaselineProfile>,
    classifier: Arc<ClassifierAdapter>,
}

impl Diagnostician {
    /// Create a pipeline over the canonical schema.
    ///
    /// Fails when the classifier artifacts were trained on a different
    /// feature order.
    pub fn new(
        baseline: Arc<BaselineProfile>,
        classifier: Arc<ClassifierAdapter>,
        config: DeviationConfig,
    ) -> Result<Self, DiagnosticError> {
        let schema = FeatureSchema::canonical();
        classifier.verify_schema(&schema)?;

        info!(
            "Diagnostic pipeline ready: {} features, deviation threshold {:.2}",
            schema.len(),
            config.threshold
        );
        Ok(Self {
            builder: FeatureVectorBuilder::new(schema),
            analyzer: DeviationAnalyzer::new(config),
            baseline,
            classifier,
        })
    }

    /// Shared healthy baseline
    pub fn baseline(&self) -> &BaselineProfile {
        &self.baseline
    }

    /// Diagnose one telemetry table
    pub fn diagnose(&self, table: &RawTable) -> Result<DiagnosticResult, DiagnosticError> {
        debug!(
            "Diagnosing table with {} columns and {} rows",
            table.column_count(),
            table.row_count()
        );

        let vector = self.builder.build(table);
        let notes = self.analyzer.analyze(&vector, &self.baseline);
        let label = self.classifier.classify(&vector)?;

        info!(
            "Diagnosis complete: {} with {} deviation notes",
            label.as_str(),
            notes.len()
        );
        Ok(assemble(label, vector, (*self.baseline).clone(), notes))
    }

    /// Parse an uploaded CSV log and diagnose it
    pub fn diagnose_csv(&self, bytes: &[u8]) -> Result<DiagnosticResult, DiagnosticError> {
        let table = TableReader::from_bytes(bytes)?;
        self.diagnose(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::HEALTHY_FALLBACK_NOTE;
    use feature_engine::{build_baseline, CANONICAL_FEATURES, FEATURE_DIMENSION};
    use inference_engine::{ClassifierError, Label, LinearClassifier, StandardScaler};

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn healthy_reference() -> RawTable {
        RawTable::from_rows(
            CANONICAL_FEATURES,
            vec![
                cells(&["50"; FEATURE_DIMENSION]),
                cells(&["60"; FEATURE_DIMENSION]),
            ],
        )
    }

    /// Abnormal when the mean CPU core temperature exceeds 80 °C
    fn classifier() -> Arc<ClassifierAdapter> {
        let mut weights = vec![0.0; FEATURE_DIMENSION];
        weights[1] = 1.0;
        let mut mean = vec![0.0; FEATURE_DIMENSION];
        mean[1] = 80.0;
        let scaler = StandardScaler::new(
            CANONICAL_FEATURES.iter().map(|f| f.to_string()).collect(),
            mean,
            vec![1.0; FEATURE_DIMENSION],
        )
        .unwrap();
        Arc::new(ClassifierAdapter::new(scaler, Box::new(LinearClassifier::new(weights, 0.0))).unwrap())
    }

    fn diagnostician() -> Diagnostician {
        let baseline = build_baseline(&healthy_reference(), &FeatureSchema::canonical());
        Diagnostician::new(Arc::new(baseline), classifier(), DeviationConfig::default()).unwrap()
    }

    #[test]
    fn test_vendor_headers_with_malformed_cell() {
        let table = RawTable::from_rows(
            ["CPU Core Temp(C)", "GPU Temp C"],
            vec![
                cells(&["45.5", "60 °C"]),
                cells(&["n/a", "62"]),
                cells(&["47.5", "61"]),
            ],
        );

        let result = diagnostician().diagnose(&table).unwrap();

        assert!(matches!(result.label(), Label::Healthy | Label::Abnormal));
        assert_eq!(result.feature_values().len(), FEATURE_DIMENSION);
        assert_eq!(result.feature_values().names(), CANONICAL_FEATURES.to_vec());
        assert!(result.feature_values().values().iter().all(|v| v.is_finite()));

        let noted: Vec<&str> = result.notes().iter().map(|n| n.feature.as_str()).collect();
        let mut ordered = noted.clone();
        ordered.sort_by_key(|f| CANONICAL_FEATURES.iter().position(|c| c == f));
        assert_eq!(noted, ordered);
    }

    #[test]
    fn test_matching_log_close_to_baseline_is_healthy() {
        let table = RawTable::from_rows(CANONICAL_FEATURES, vec![cells(&["56"; FEATURE_DIMENSION])]);

        let result = diagnostician().diagnose(&table).unwrap();

        assert_eq!(result.label(), Label::Healthy);
        assert!(result.notes().is_empty());
        assert_eq!(result.note_lines(), vec![HEALTHY_FALLBACK_NOTE.to_string()]);
        assert_eq!(result.baseline_values().get("CPU Core [°C]"), Some(55.0));
    }

    #[test]
    fn test_hot_cpu_is_abnormal_with_note() {
        let table = RawTable::from_rows(
            ["cpu core [°C]", "Physical Memory Load [%]"],
            vec![cells(&["90 °C", "55 %"]), cells(&["92 °C", "57 %"])],
        );

        let result = diagnostician().diagnose(&table).unwrap();

        assert_eq!(result.label(), Label::Abnormal);
        let cpu_note = result
            .notes()
            .iter()
            .find(|n| n.feature == "CPU Core [°C]")
            .unwrap();
        assert_eq!(cpu_note.baseline_value, 55.0);
        assert_eq!(cpu_note.observed_value, 91.0);
        assert!(result.notes().iter().all(|n| n.feature != "Physical Memory Load [%]"));
    }

    #[test]
    fn test_diagnose_csv() {
        let csv = "Date,Time,CPU Core [°C],GPU Temperature [°C]\n01.01.2024,10:00:00,55.0,60.0\n";
        let result = diagnostician().diagnose_csv(csv.as_bytes()).unwrap();
        assert_eq!(result.feature_values().get("CPU Core [°C]"), Some(55.0));
    }

    #[test]
    fn test_unparseable_upload_is_one_error() {
        let err = diagnostician().diagnose_csv(b"").unwrap_err();
        assert!(matches!(err, DiagnosticError::Table(_)));
    }

    #[test]
    fn test_artifacts_for_other_schema_are_rejected() {
        let scaler = StandardScaler::identity(["a", "b"]);
        let adapter = ClassifierAdapter::new(scaler, Box::new(LinearClassifier::new(vec![1.0, 1.0], 0.0))).unwrap();
        let result = Diagnostician::new(
            Arc::new(BaselineProfile::default()),
            Arc::new(adapter),
            DeviationConfig::default(),
        );
        assert!(matches!(
            result,
            Err(DiagnosticError::Classifier(ClassifierError::ArtifactLoad(_)))
        ));
    }
}
