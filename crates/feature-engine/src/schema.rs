//! Canonical Feature Schema

/// Telemetry metrics the classifier and scaler were trained on.
///
/// Order is significant: baseline construction, vector assembly and model
/// input all index features by position in this list.
pub const CANONICAL_FEATURES: [&str; 16] = [
    "Core Temperatures (avg) [°C]",
    "CPU Core [°C]",
    "CPU Package Power [W]",
    "Total CPU Utility [%]",
    "GPU Temperature [°C]",
    "GPU Hot Spot Temperature [°C]",
    "GPU Power [W]",
    "GPU Utilization [%]",
    "GPU Memory Usage [%]",
    "Physical Memory Load [%]",
    "Virtual Memory Load [%]",
    "Charge Level [%]",
    "Wear Level [%]",
    "GPU Bus Load [%]",
    "Framerate Displayed (avg) [FPS]",
    "Frame Time Presented (avg) [ms]",
];

/// Number of features in the canonical vector
pub const FEATURE_DIMENSION: usize = CANONICAL_FEATURES.len();

/// Ordered list of feature names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Schema over an arbitrary ordered feature list
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The canonical schema shared by every pipeline stage
    pub fn canonical() -> Self {
        Self::new(CANONICAL_FEATURES)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::canonical()
    }
}
