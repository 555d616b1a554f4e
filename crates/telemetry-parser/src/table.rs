//! Raw Telemetry Table and CSV Ingestion

use crate::error::TableError;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Sampled telemetry as an explicit header -> cells mapping.
///
/// Headers keep input order and may repeat. Every column holds exactly
/// `row_count` cells; short rows are padded with empty cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
    row_count: usize,
}

impl RawTable {
    /// Create an empty table with the given headers
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let columns = vec![Vec::new(); headers.len()];
        Self {
            headers,
            columns,
            row_count: 0,
        }
    }

    /// Build a table from row-major data
    pub fn from_rows<S: Into<String>>(
        headers: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<String>>,
    ) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row; missing trailing cells become empty, extra cells are dropped
    pub fn push_row(&mut self, row: Vec<String>) {
        let mut cells = row.into_iter();
        for column in &mut self.columns {
            column.push(cells.next().unwrap_or_default());
        }
        self.row_count += 1;
    }

    /// Headers in input order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Cells of the first column with exactly this header
    pub fn column(&self, header: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .position(|h| h == header)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Number of sampled rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// CSV reader for vendor-exported telemetry logs
pub struct TableReader;

impl TableReader {
    /// Read a table from a CSV file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<RawTable, TableError> {
        let path = path.as_ref();
        info!("Reading telemetry table from {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Read a table from raw CSV bytes.
    ///
    /// Text is decoded as UTF-8 when valid and as Latin-1 otherwise, since
    /// hardware monitors commonly export in the local code page.
    pub fn from_bytes(bytes: &[u8]) -> Result<RawTable, TableError> {
        let decoded = decode(bytes);
        let text: &str = decoded.strip_prefix('\u{feff}').unwrap_or(&*decoded);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(TableError::MissingHeader);
        }

        let mut table = RawTable::new(headers);
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                skipped += 1;
                continue;
            }
            table.push_row(record.iter().map(str::to_string).collect());
        }

        debug!(
            "Parsed table: {} columns, {} rows ({} blank rows skipped)",
            table.column_count(),
            table.row_count(),
            skipped
        );
        Ok(table)
    }
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}
