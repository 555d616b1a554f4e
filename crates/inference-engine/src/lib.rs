//! Health Classifier Inference
//!
//! Wraps a pretrained feature scaler and binary classifier behind a
//! shape-checked `classify(vector) -> Label` contract.

mod engine;
mod model;
mod scaler;

pub use engine::{ClassifierAdapter, Label};
pub use model::{BinaryClassifier, LinearClassifier, OnnxClassifier};
pub use scaler::StandardScaler;

use thiserror::Error;

/// Errors during artifact loading and classification
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Artifact load failed: {0}")]
    ArtifactLoad(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}
