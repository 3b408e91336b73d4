//! Bar source trait and structured error types.
//!
//! `BarSource` abstracts over where chart bars come from (CSV import or the
//! synthetic generator) so the CLI and tests can swap them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid bar at row {row}: {reason}")]
    Validation { row: usize, reason: String },

    #[error("no bars in {0}")]
    Empty(String),
}

/// Where the bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    CsvImport,
    Synthetic,
}

/// Trait for bar sources.
pub trait BarSource {
    /// Human-readable description of this source.
    fn name(&self) -> String;

    fn kind(&self) -> DataSource;

    /// Load the full bar history, ascending by time.
    fn load(&self) -> Result<Vec<Bar>, DataError>;
}
