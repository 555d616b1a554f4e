//! Service Settings
//!
//! Layered from an optional config file and `HWDIAG__*` environment
//! variables, e.g. `HWDIAG__SERVER__BIND_ADDR=127.0.0.1:9000`.

use crate::rate_limit::RateLimitConfig;
use diagnostics::DeviationConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Default config file (any extension supported by `config`)
pub const DEFAULT_CONFIG_PATH: &str = "config/diagnostics";

/// Root service settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub artifacts: ArtifactSettings,
    pub analysis: DeviationConfig,
    pub logging: LoggingSettings,
    pub rate_limit: RateLimitConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address
    pub bind_addr: String,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Classifier artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// ONNX graph executed with tract
    Onnx,
    /// JSON linear decision function
    Linear,
}

/// Locations of the startup artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactSettings {
    /// Healthy reference log used for the baseline profile
    pub baseline_csv: PathBuf,
    /// Fitted scaler (JSON)
    pub scaler: PathBuf,
    /// Trained classifier
    pub model: PathBuf,
    pub model_kind: ModelKind,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            baseline_csv: PathBuf::from("Healthy.csv"),
            scaler: PathBuf::from("model/scaler.json"),
            model: PathBuf::from("model/hardware_health_model.onnx"),
            model_kind: ModelKind::Onnx,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Maximum level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from `path` (optional file) and the environment
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("HWDIAG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
