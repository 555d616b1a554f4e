//! Hardware Health Diagnostics API Server
//!
//! Accepts telemetry log uploads and returns the diagnostic result as JSON.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use diagnostics::Diagnostician;
use feature_engine::{build_baseline, FeatureSchema};
use inference_engine::{BinaryClassifier, ClassifierAdapter, LinearClassifier, OnnxClassifier, StandardScaler};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use telemetry_parser::TableReader;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod rate_limit;
mod routes;
mod settings;

pub use error::{ApiError, ErrorResponse, StartupError};
pub use rate_limit::{create_governor_config, spawn_limiter_cleanup, RateLimitConfig};
pub use routes::diagnose::DiagnoseResponse;
pub use settings::{ArtifactSettings, LoggingSettings, ModelKind, ServerSettings, Settings, DEFAULT_CONFIG_PATH};

/// Application state shared across handlers, read-only after startup
pub struct AppState {
    /// Pipeline over the shared baseline and classifier
    pub diagnostician: Diagnostician,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(diagnostician: Diagnostician, metrics: Option<PrometheusHandle>, max_upload_bytes: usize) -> Self {
        Self {
            diagnostician,
            metrics,
            max_upload_bytes,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Load baseline and model artifacts; any failure is fatal
    pub fn from_settings(settings: &Settings, metrics: Option<PrometheusHandle>) -> Result<Self, StartupError> {
        let artifacts = &settings.artifacts;
        let schema = FeatureSchema::canonical();

        let reference = TableReader::from_path(&artifacts.baseline_csv)?;
        let baseline = build_baseline(&reference, &schema);

        let scaler = StandardScaler::from_path(&artifacts.scaler)?;
        let model: Box<dyn BinaryClassifier> = match artifacts.model_kind {
            ModelKind::Onnx => Box::new(OnnxClassifier::load(&artifacts.model, scaler.len())?),
            ModelKind::Linear => Box::new(LinearClassifier::from_path(&artifacts.model)?),
        };
        let classifier = ClassifierAdapter::new(scaler, model)?;

        let diagnostician = Diagnostician::new(
            Arc::new(baseline),
            Arc::new(classifier),
            settings.analysis.clone(),
        )?;

        Ok(Self::new(diagnostician, metrics, settings.server.max_upload_bytes))
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub baseline_features: usize,
    pub untracked_features: Vec<String>,
}

/// Create the application router.
///
/// Uploads are rate limited per peer IP when `rate_limit` is given; idle
/// client entries are then evicted by a background task, so this must run
/// inside a tokio runtime.
pub fn create_router(state: Arc<AppState>, rate_limit: Option<&RateLimitConfig>) -> Router {
    let mut uploads = Router::new().route("/api/v1/diagnose", post(routes::diagnose::diagnose_upload));
    if let Some(limits) = rate_limit {
        if let Some(config) = create_governor_config(limits) {
            spawn_limiter_cleanup(&config, limits.cleanup_interval_secs);
            uploads = uploads.layer(GovernorLayer { config });
        }
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(uploads)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let baseline = state.diagnostician.baseline();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        baseline_features: baseline.tracked_count(),
        untracked_features: baseline.untracked().into_iter().map(String::from).collect(),
    })
}

/// Prometheus metrics handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(settings: &LoggingSettings) -> Result<(), StartupError> {
    let level: Level = settings
        .level
        .parse()
        .map_err(|_| StartupError::Config(format!("invalid log level '{}'", settings.level)))?;

    let result = if settings.json {
        let subscriber = FmtSubscriber::builder()
            .json()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    result.map_err(|e| StartupError::Config(format!("failed to set tracing subscriber: {}", e)))
}

/// Load artifacts and run the server
pub async fn run_server(settings: Settings) -> Result<(), StartupError> {
    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| StartupError::Config(format!("metrics recorder: {}", e)))?;

    let state = Arc::new(AppState::from_settings(&settings, Some(metrics))?);
    let app = create_router(state, Some(&settings.rate_limit));

    info!("Starting API server on {}", settings.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
