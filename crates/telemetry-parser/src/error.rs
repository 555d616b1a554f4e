//! Table Ingestion Error Types

use thiserror::Error;

/// Errors while reading a telemetry table
#[derive(Debug, Error)]
pub enum TableError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// CSV structure could not be parsed
    #[error("Malformed CSV: {0}")]
    Csv(String),

    /// Input had no header row to parse columns from
    #[error("No columns to parse from input")]
    MissingHeader,
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::Io(err.to_string())
    }
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Csv(err.to_string())
    }
}
