//! Baseline Deviation Analysis

use feature_engine::{BaselineProfile, FeatureVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Deviation analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviationConfig {
    /// Relative deviation above which a feature is flagged (default: 0.1)
    pub threshold: f64,
}

impl Default for DeviationConfig {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

/// A feature observed too far from its healthy baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationNote {
    pub feature: String,
    pub baseline_value: f64,
    pub observed_value: f64,
    /// `|observed - baseline| / baseline`
    pub relative_deviation: f64,
}

impl fmt::Display for DeviationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deviates from healthy value ({:.2}). Current: {:.2}",
            self.feature, self.baseline_value, self.observed_value
        )
    }
}

/// Flags features whose observed value strays from the baseline
#[derive(Debug, Clone, Default)]
pub struct DeviationAnalyzer {
    config: DeviationConfig,
}

impl DeviationAnalyzer {
    pub fn new(config: DeviationConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Notes in vector order for every feature beyond the threshold.
    ///
    /// Features without a positive baseline cannot be judged and are skipped.
    pub fn analyze(&self, vector: &FeatureVector, baseline: &BaselineProfile) -> Vec<DeviationNote> {
        let notes: Vec<DeviationNote> = vector
            .iter()
            .filter_map(|feature| {
                let reference = baseline.get(&feature.name).filter(|b| *b > 0.0)?;
                let relative_deviation = (feature.value - reference).abs() / reference;
                (relative_deviation > self.config.threshold).then(|| DeviationNote {
                    feature: feature.name.clone(),
                    baseline_value: reference,
                    observed_value: feature.value,
                    relative_deviation,
                })
            })
            .collect();

        debug!(
            "{} of {} features deviate more than {:.0}% from baseline",
            notes.len(),
            vector.len(),
            self.config.threshold * 100.0
        );
        notes
    }
}

/// Analyze a vector against a baseline with the default threshold
pub fn analyze(vector: &FeatureVector, baseline: &BaselineProfile) -> Vec<DeviationNote> {
    DeviationAnalyzer::default().analyze(vector, baseline)
}
