//! Diagnosis Upload Route

use axum::{
    extract::{Multipart, State},
    Json,
};
use diagnostics::{ChartPoint, DiagnosticResult};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::{ApiError, AppState};

/// Multipart field carrying the log
const UPLOAD_FIELD: &str = "file";

/// Accepted upload extensions
const ALLOWED_EXTENSIONS: [&str; 1] = ["csv"];

/// Response for a successful diagnosis
#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub filename: String,
    /// Verdict sentence
    pub headline: &'static str,
    /// Deviation notes, or the healthy fallback line
    pub summary: Vec<String>,
    /// Observed values formatted to two decimals
    pub key_metrics: Vec<String>,
    /// Baseline vs observed values for charting
    pub chart: Vec<ChartPoint>,
    pub result: DiagnosticResult,
}

impl DiagnoseResponse {
    fn new(filename: String, result: DiagnosticResult) -> Self {
        Self {
            filename,
            headline: result.headline(),
            summary: result.note_lines(),
            key_metrics: result.key_metrics(),
            chart: result.chart_series(),
            result,
        }
    }
}

fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Diagnose an uploaded telemetry log
pub async fn diagnose_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| ApiError::BadRequest("No file uploaded.".to_string()))?;
    if filename.is_empty() {
        return Err(ApiError::BadRequest("Please select a file.".to_string()));
    }
    if !allowed_file(&filename) {
        return Err(ApiError::BadRequest(
            "Unsupported file format. Please upload CSV from HWInfo.".to_string(),
        ));
    }

    info!("Diagnosing upload '{}' ({} bytes)", filename, data.len());
    let started = Instant::now();

    let pipeline_state = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || pipeline_state.diagnostician.diagnose_csv(&data))
        .await
        .map_err(|e| ApiError::Internal(format!("diagnosis task failed: {}", e)))?;

    metrics::histogram!("diagnosis_duration_seconds").record(started.elapsed().as_secs_f64());

    match outcome {
        Ok(result) => {
            metrics::counter!("diagnoses_total", "label" => result.label().as_str()).increment(1);
            Ok(Json(DiagnoseResponse::new(filename, result)))
        }
        Err(e) => {
            warn!("Diagnosis of '{}' failed: {}", filename, e);
            metrics::counter!("diagnosis_failures_total").increment(1);
            Err(e.into())
        }
    }
}
