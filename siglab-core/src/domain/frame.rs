//! Frame — a bar series plus named indicator columns, aligned by row.
//!
//! A frame is built once per evaluation (bars in, indicator columns inserted)
//! and read-only afterwards. Condition evaluation never mutates it; signal
//! masks are returned as fresh values and merged by the host.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::bar::Bar;

/// Base price/volume series a rolling operand can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesSource {
    Close,
    Volume,
}

/// A bar series with named f64 indicator columns, all aligned 1:1 by row.
///
/// Column lookup returns `None` for unknown names; callers that require a
/// column (condition evaluation) convert that into a missing-indicator
/// error rather than treating the column as false.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    bars: Vec<Bar>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
    columns: HashMap<String, Vec<f64>>,
}

impl Frame {
    pub fn new(bars: Vec<Bar>) -> Self {
        let closes = bars.iter().map(|b| b.close).collect();
        let volumes = bars.iter().map(|b| b.volume).collect();
        Self {
            bars,
            closes,
            volumes,
            columns: HashMap::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    pub fn source(&self, source: SeriesSource) -> &[f64] {
        match source {
            SeriesSource::Close => &self.closes,
            SeriesSource::Volume => &self.volumes,
        }
    }

    /// Insert a named indicator column.
    ///
    /// # Panics
    /// Panics if the column length does not match the bar count — columns
    /// are always aligned 1:1 with bars by construction.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) {
        assert_eq!(
            values.len(),
            self.bars.len(),
            "column length must match bar count"
        );
        self.columns.insert(name.into(), values);
    }

    /// Look up a named indicator column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of indicator columns stored.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2021, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: base + chrono::Duration::minutes(5 * i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn frame_caches_close_and_volume() {
        let frame = Frame::new(make_bars(&[10.0, 11.0, 12.0]));
        assert_eq!(frame.closes(), &[10.0, 11.0, 12.0]);
        assert_eq!(frame.volumes(), &[1000.0, 1000.0, 1000.0]);
        assert_eq!(frame.source(SeriesSource::Close), frame.closes());
        assert_eq!(frame.source(SeriesSource::Volume), frame.volumes());
    }

    #[test]
    fn insert_and_lookup_column() {
        let mut frame = Frame::new(make_bars(&[10.0, 11.0, 12.0]));
        frame.insert_column("rsi", vec![f64::NAN, 40.0, 60.0]);
        assert!(frame.has_column("rsi"));
        assert_eq!(frame.column("rsi").unwrap()[1], 40.0);
        assert_eq!(frame.column_count(), 1);
    }

    #[test]
    fn missing_column_is_none() {
        let frame = Frame::new(make_bars(&[10.0]));
        assert!(frame.column("nonexistent").is_none());
    }

    #[test]
    #[should_panic(expected = "column length must match bar count")]
    fn misaligned_column_panics() {
        let mut frame = Frame::new(make_bars(&[10.0, 11.0]));
        frame.insert_column("bad", vec![1.0]);
    }
}
