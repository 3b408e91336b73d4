//! CSV import and export of bar histories.
//!
//! Columns: `time,open,high,low,close,volume` with `time` in unix seconds.
//! `volume` may be omitted. Import validates every row: finite and sane OHLC
//! and strictly ascending timestamps, which is the input contract of the
//! indicator engine.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::provider::{BarSource, DataError, DataSource};
use crate::domain::Bar;

/// Read and validate bars from a CSV file.
pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = read_bars_from(file)?;
    info!(path = %path.display(), bars = bars.len(), "loaded bars from CSV");
    Ok(bars)
}

/// Read and validate bars from any CSV reader. A header-only input yields an
/// empty vector.
pub fn read_bars_from<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars: Vec<Bar> = Vec::new();
    for (i, record) in rdr.deserialize::<Bar>().enumerate() {
        // Row 1 is the first data row after the header
        let row = i + 1;
        let bar = record?;
        validate(&bar, bars.last(), row)?;
        bars.push(bar);
    }

    debug!(rows = bars.len(), "parsed CSV bars");
    Ok(bars)
}

fn validate(bar: &Bar, previous: Option<&Bar>, row: usize) -> Result<(), DataError> {
    if !bar.is_finite() {
        return Err(DataError::Validation {
            row,
            reason: "non-finite OHLC value".into(),
        });
    }
    if !bar.is_sane() {
        return Err(DataError::Validation {
            row,
            reason: format!(
                "high/low do not bracket open/close (o={}, h={}, l={}, c={})",
                bar.open, bar.high, bar.low, bar.close
            ),
        });
    }
    if let Some(prev) = previous {
        if bar.time <= prev.time {
            return Err(DataError::Validation {
                row,
                reason: format!("time {} is not after previous time {}", bar.time, prev.time),
            });
        }
    }
    Ok(())
}

/// Write bars as CSV to a file, replacing it.
pub fn write_bars(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    let file = File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_bars_to(file, bars).map_err(|err| match err {
        DataError::Io { source, .. } => DataError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(path = %path.display(), bars = bars.len(), "wrote bars to CSV");
    Ok(())
}

/// Write bars as CSV to any writer, header first.
pub fn write_bars_to<W: Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bar in bars {
        wtr.serialize(bar)?;
    }
    wtr.flush().map_err(|source| DataError::Io {
        path: PathBuf::from("<writer>"),
        source,
    })?;
    Ok(())
}

/// A CSV file as a [`BarSource`].
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BarSource for CsvSource {
    fn name(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn kind(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn load(&self) -> Result<Vec<Bar>, DataError> {
        let bars = read_bars(&self.path)?;
        if bars.is_empty() {
            return Err(DataError::Empty(self.name()));
        }
        Ok(bars)
    }
}
