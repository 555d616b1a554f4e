//! Binary Classifier Backends

use crate::ClassifierError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// Pretrained binary classifier over a scaled feature row.
///
/// Returns the raw class code; `0` means healthy.
pub trait BinaryClassifier: Send + Sync {
    /// Predict the class code for one scaled row
    fn predict(&self, scaled: &[f64]) -> Result<i64, ClassifierError>;

    /// Number of input features the model was trained on, when known
    fn input_dimension(&self) -> Option<usize> {
        None
    }
}

/// ONNX classifier executed with tract.
///
/// The graph must take a single `[1, n]` float input and expose the predicted
/// label as its first output (scikit-learn exports with ZipMap disabled).
pub struct OnnxClassifier {
    model: TypedRunnableModel<TypedModel>,
    dimension: usize,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model for a fixed input width
    pub fn load(path: impl AsRef<Path>, dimension: usize) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        info!("Loading ONNX classifier from {} ({} inputs)", path.display(), dimension);

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, dimension]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;

        info!("ONNX classifier loaded successfully");
        Ok(Self { model, dimension })
    }
}

impl BinaryClassifier for OnnxClassifier {
    fn predict(&self, scaled: &[f64]) -> Result<i64, ClassifierError> {
        if scaled.len() != self.dimension {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} model inputs", self.dimension),
                actual: format!("{} model inputs", scaled.len()),
            });
        }

        let row: Vec<f32> = scaled.iter().map(|&v| v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.dimension), row)
            .map_err(|e| ClassifierError::InferenceFailed(e.to_string()))?
            .into();

        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| ClassifierError::InferenceFailed(e.to_string()))?;

        let label = outputs
            .first()
            .ok_or_else(|| ClassifierError::InferenceFailed("model produced no outputs".to_string()))?;
        let label = label
            .cast_to::<i64>()
            .map_err(|e| ClassifierError::InferenceFailed(format!("label output: {}", e)))?;
        let code = label
            .as_slice::<i64>()
            .map_err(|e| ClassifierError::InferenceFailed(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| ClassifierError::InferenceFailed("empty label output".to_string()))?;

        debug!("ONNX classifier predicted class {}", code);
        Ok(code)
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

/// Linear decision function `w·x + b > 0 => 1`, as fitted by logistic
/// regression or a linear SVM
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearClassifier {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearClassifier {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Load weights from a JSON file `{"weights": [...], "intercept": b}`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;
        let model: Self = serde_json::from_str(&json)
            .map_err(|e| ClassifierError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;
        info!("Loaded linear classifier with {} weights", model.weights.len());
        Ok(model)
    }

    /// Raw decision value for one scaled row
    pub fn decision(&self, scaled: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(scaled)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl BinaryClassifier for LinearClassifier {
    fn predict(&self, scaled: &[f64]) -> Result<i64, ClassifierError> {
        if scaled.len() != self.weights.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} model inputs", self.weights.len()),
                actual: format!("{} model inputs", scaled.len()),
            });
        }

        let decision = self.decision(scaled);
        if !decision.is_finite() {
            return Err(ClassifierError::InferenceFailed(format!(
                "non-finite decision value {}",
                decision
            )));
        }
        Ok(if decision > 0.0 { 1 } else { 0 })
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_decision() {
        let model = LinearClassifier::new(vec![1.0, -1.0], 0.5);
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0, 2.0]).unwrap(), 0);
    }

    #[test]
    fn test_linear_rejects_wrong_width() {
        let model = LinearClassifier::new(vec![1.0, 1.0], 0.0);
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ClassifierError::ShapeMismatch { .. })
        ));
        assert_eq!(model.input_dimension(), Some(2));
    }

    #[test]
    fn test_onnx_missing_file_is_load_failure() {
        let result = OnnxClassifier::load("/nonexistent/model.onnx", 16);
        assert!(matches!(result, Err(ClassifierError::ArtifactLoad(_))));
    }
}
