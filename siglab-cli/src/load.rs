//! CSV bar ingestion.
//!
//! Expected header: `timestamp,open,high,low,close,volume`, timestamps as
//! `%Y-%m-%d %H:%M:%S`. Rows must be chronological; out-of-order rows are a
//! load error rather than silently resorted.

use std::path::Path;

use chrono::NaiveDateTime;
use siglab_core::domain::Bar;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("csv parse error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("row {row}: bad timestamp '{value}'")]
    Timestamp { row: usize, value: String },
    #[error("row {row}: bad numeric field '{value}'")]
    Numeric { row: usize, value: String },
    #[error("row {row}: timestamps not chronological")]
    OutOfOrder { row: usize },
    #[error("{path}: no bar rows")]
    Empty { path: String },
}

/// Load a bar series from a CSV file.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let display = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        if matches!(e.kind(), csv::ErrorKind::Io(_)) {
            LoadError::Io {
                path: display.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            }
        } else {
            LoadError::Csv {
                path: display.clone(),
                source: e,
            }
        }
    })?;

    let mut bars: Vec<Bar> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 2; // 1-based, after the header
        let record = record.map_err(|e| LoadError::Csv {
            path: display.clone(),
            source: e,
        })?;

        let timestamp_field = record.get(0).unwrap_or_default();
        let timestamp = NaiveDateTime::parse_from_str(timestamp_field, TIMESTAMP_FORMAT)
            .map_err(|_| LoadError::Timestamp {
                row,
                value: timestamp_field.to_string(),
            })?;

        let numeric = |idx: usize| -> Result<f64, LoadError> {
            let field = record.get(idx).unwrap_or_default();
            field.parse::<f64>().map_err(|_| LoadError::Numeric {
                row,
                value: field.to_string(),
            })
        };

        let bar = Bar {
            timestamp,
            open: numeric(1)?,
            high: numeric(2)?,
            low: numeric(3)?,
            close: numeric(4)?,
            volume: numeric(5)?,
        };

        if let Some(prev) = bars.last() {
            if bar.timestamp <= prev.timestamp {
                return Err(LoadError::OutOfOrder { row });
            }
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::Empty { path: display });
    }
    Ok(bars)
}
