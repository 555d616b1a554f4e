//! Telemetry Table Parsing
//!
//! Turns vendor-exported hardware logs into an explicit header -> cells table,
//! reconciles inconsistent column headers against a canonical feature list,
//! and extracts numbers from noisy cell text.

mod error;
mod numeric;
mod reconcile;
mod table;

pub use error::TableError;
pub use numeric::{extract_column, extract_numeric};
pub use reconcile::{normalize_name, reconcile, ColumnMatch, Reconciliation};
pub use table::{RawTable, TableReader};
