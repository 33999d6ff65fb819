//! Domain errors raised while loading and reducing gridded data.
//!
//! The application layer wraps these in `anyhow::Error`; they are kept as a
//! typed enum so callers and tests can tell an empty baseline apart from a
//! broken input file.

use std::path::PathBuf;

use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum ClimatologyError {
    /// No annual grids were produced, usually because the date range does not
    /// overlap the dataset.
    #[error("insufficient data: no years to average")]
    InsufficientData,

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable { name: String, path: PathBuf },

    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// The data variable's dimensions are not (day, lat, lon) in that order.
    #[error("variable '{variable}' has dimensions ({got}), expected ({expected})")]
    DimensionOrder {
        variable: String,
        expected: String,
        got: String,
    },

    #[error("invalid time: {reason}")]
    InvalidTime { reason: String },

    /// Two grids that must share a shape or coordinates do not.
    #[error("grid mismatch: {reason}")]
    GridMismatch { reason: String },
}

// -- Tests -------------------------------------------------------------------
