//! Bar sources: CSV import/export and the synthetic generator

pub mod ingest;
pub mod provider;
pub mod synthetic;

pub use ingest::{read_bars, read_bars_from, write_bars, write_bars_to, CsvSource};
pub use provider::{BarSource, DataError, DataSource};
pub use synthetic::{generate_bars, SyntheticSource, DEFAULT_BAR_COUNT};
