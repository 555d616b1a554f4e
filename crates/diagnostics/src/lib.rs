//! Hardware Health Diagnostics
//!
//! Compares a feature vector against the healthy baseline, combines the
//! deviation notes with the classifier verdict, and runs the whole chain for
//! one uploaded telemetry log.

mod deviation;
mod pipeline;
mod result;

pub use deviation::{analyze, DeviationAnalyzer, DeviationConfig, DeviationNote};
pub use pipeline::Diagnostician;
pub use result::{assemble, ChartPoint, DiagnosticResult, CHART_FEATURES, HEALTHY_FALLBACK_NOTE};

use inference_engine::ClassifierError;
use telemetry_parser::TableError;
use thiserror::Error;

/// Errors that abort a single diagnosis
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("Error processing file: {0}")]
    Table(#[from] TableError),
    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),
}
