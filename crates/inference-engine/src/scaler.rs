//! Standard Scaling Transform

use crate::ClassifierError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Per-feature standardization `(x - mean) / scale` fitted on training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalerArtifact")]
pub struct StandardScaler {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// On-disk layout of a fitted scaler
#[derive(Deserialize)]
struct ScalerArtifact {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl TryFrom<ScalerArtifact> for StandardScaler {
    type Error = ClassifierError;

    fn try_from(artifact: ScalerArtifact) -> Result<Self, Self::Error> {
        StandardScaler::new(artifact.feature_names, artifact.mean, artifact.scale)
    }
}

impl StandardScaler {
    /// Create a scaler; all three vectors must have the same length
    pub fn new(
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, ClassifierError> {
        if mean.len() != feature_names.len() || scale.len() != feature_names.len() {
            return Err(ClassifierError::ArtifactLoad(format!(
                "scaler has {} feature names, {} means, {} scales",
                feature_names.len(),
                mean.len(),
                scale.len()
            )));
        }
        if mean.iter().chain(&scale).any(|v| !v.is_finite()) {
            return Err(ClassifierError::ArtifactLoad(
                "scaler contains non-finite parameters".to_string(),
            ));
        }

        Ok(Self {
            feature_names,
            mean,
            scale,
        })
    }

    /// Pass-through scaler over the given features
    pub fn identity<S: Into<String>>(feature_names: impl IntoIterator<Item = S>) -> Self {
        let feature_names: Vec<String> = feature_names.into_iter().map(Into::into).collect();
        let n = feature_names.len();
        Self {
            feature_names,
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    /// Parse a fitted scaler from JSON
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        serde_json::from_str(json).map_err(|e| ClassifierError::ArtifactLoad(format!("scaler: {}", e)))
    }

    /// Load a fitted scaler from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;
        let scaler = Self::from_json(&json)?;
        info!("Loaded scaler for {} features from {}", scaler.len(), path.display());
        Ok(scaler)
    }

    /// Feature order the scaler was fitted on
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    /// Standardize a row of values
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        if values.len() != self.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} features", self.len()),
                actual: format!("{} features", values.len()),
            });
        }

        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant training features carry a zero scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(
            vec!["a".into(), "b".into()],
            vec![10.0, 0.0],
            vec![2.0, 0.0],
        )
        .unwrap();

        assert_eq!(scaler.transform(&[14.0, 3.0]).unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_transform_rejects_wrong_length() {
        let scaler = StandardScaler::identity(["a", "b"]);
        assert!(matches!(
            scaler.transform(&[1.0]),
            Err(ClassifierError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let scaler = StandardScaler::from_json(
            r#"{"feature_names": ["a", "b"], "mean": [1.0, 2.0], "scale": [1.0, 4.0]}"#,
        )
        .unwrap();
        assert_eq!(scaler.feature_names(), &["a", "b"]);
        assert_eq!(scaler.transform(&[1.0, 6.0]).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_from_json_rejects_inconsistent_lengths() {
        let result = StandardScaler::from_json(
            r#"{"feature_names": ["a", "b"], "mean": [1.0], "scale": [1.0, 4.0]}"#,
        );
        assert!(matches!(result, Err(ClassifierError::ArtifactLoad(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = StandardScaler::from_path("/nonexistent/scaler.json");
        assert!(matches!(result, Err(ClassifierError::ArtifactLoad(_))));
    }
}
