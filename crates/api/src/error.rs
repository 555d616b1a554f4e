//! API and Startup Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diagnostics::DiagnosticError;
use inference_engine::ClassifierError;
use serde::Serialize;
use telemetry_parser::TableError;
use thiserror::Error;

/// Failures that prevent the service from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Artifact load failed: {0}")]
    ArtifactLoad(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for StartupError {
    fn from(err: config::ConfigError) -> Self {
        StartupError::Config(err.to_string())
    }
}

impl From<TableError> for StartupError {
    fn from(err: TableError) -> Self {
        StartupError::ArtifactLoad(format!("baseline dataset: {}", err))
    }
}

impl From<ClassifierError> for StartupError {
    fn from(err: ClassifierError) -> Self {
        StartupError::ArtifactLoad(err.to_string())
    }
}

impl From<DiagnosticError> for StartupError {
    fn from(err: DiagnosticError) -> Self {
        StartupError::ArtifactLoad(err.to_string())
    }
}

/// Per-request failures, reported as a single message
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl From<DiagnosticError> for ApiError {
    fn from(err: DiagnosticError) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
