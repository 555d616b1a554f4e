//! Classifier Adapter

use crate::model::BinaryClassifier;
use crate::scaler::StandardScaler;
use crate::ClassifierError;
use feature_engine::{FeatureSchema, FeatureVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Health classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Healthy,
    Abnormal,
}

impl Label {
    /// Map a classifier code: `0` is healthy, anything else abnormal
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            Label::Healthy
        } else {
            Label::Abnormal
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Healthy => "healthy",
            Label::Abnormal => "abnormal",
        }
    }

    /// Headline shown to the user
    pub fn headline(&self) -> &'static str {
        match self {
            Label::Healthy => "Your laptop appears to be Healthy!",
            Label::Abnormal => "Your laptop shows signs of abnormal performance!",
        }
    }
}

/// Pretrained scaler + classifier pair behind a shape-checked contract.
///
/// Immutable after construction and safe to share across requests.
pub struct ClassifierAdapter {
    scaler: StandardScaler,
    model: Box<dyn BinaryClassifier>,
}

impl ClassifierAdapter {
    /// Pair a scaler with a classifier trained on the same feature order
    pub fn new(
        scaler: StandardScaler,
        model: Box<dyn BinaryClassifier>,
    ) -> Result<Self, ClassifierError> {
        if let Some(dimension) = model.input_dimension() {
            if dimension != scaler.len() {
                return Err(ClassifierError::ArtifactLoad(format!(
                    "scaler has {} features but classifier expects {}",
                    scaler.len(),
                    dimension
                )));
            }
        }

        info!("Classifier adapter ready for {} features", scaler.len());
        Ok(Self { scaler, model })
    }

    /// Feature order the artifacts were trained on
    pub fn feature_names(&self) -> &[String] {
        self.scaler.feature_names()
    }

    /// Confirm the artifacts were trained on exactly this schema
    pub fn verify_schema(&self, schema: &FeatureSchema) -> Result<(), ClassifierError> {
        let actual: Vec<&str> = schema.names().iter().map(String::as_str).collect();
        self.check_order(&actual)
            .map_err(|e| ClassifierError::ArtifactLoad(format!("artifacts do not match feature schema: {}", e)))
    }

    /// Classify one feature vector.
    ///
    /// The vector must carry exactly the trained features in the trained
    /// order; anything else is rejected, never reordered.
    pub fn classify(&self, vector: &FeatureVector) -> Result<Label, ClassifierError> {
        self.check_order(&vector.names())?;

        let scaled = self.scaler.transform(&vector.values())?;
        let code = self.model.predict(&scaled)?;
        let label = Label::from_code(code);

        debug!("Classified vector as {} (code {})", label.as_str(), code);
        Ok(label)
    }

    fn check_order(&self, names: &[&str]) -> Result<(), ClassifierError> {
        let expected = self.feature_names();
        if names.len() != expected.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} features", expected.len()),
                actual: format!("{} features", names.len()),
            });
        }

        if let Some((idx, (want, got))) = expected
            .iter()
            .zip(names)
            .enumerate()
            .find(|(_, (want, got))| want.as_str() != **got)
        {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("'{}' at position {}", want, idx),
                actual: format!("'{}'", got),
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("features", &self.scaler.len())
            .finish_non_exhaustive()
    }
}
