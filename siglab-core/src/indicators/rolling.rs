//! Rolling window statistics: mean, min, max.
//!
//! These back both the precomputed rolling columns (`min_short`,
//! `volume-mean`, ...) and the dynamic-window operands whose window size
//! comes from a search-space parameter.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, SeriesSource};

use super::Indicator;

/// Which statistic a rolling window computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollingStat {
    Mean,
    Min,
    Max,
}

/// Compute a rolling statistic over `values` with the given window.
///
/// The first `window - 1` rows are NaN; any NaN inside a window makes that
/// row NaN. A zero window produces an all-NaN series.
pub fn rolling_stat(values: &[f64], window: usize, stat: RollingStat) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = match stat {
            RollingStat::Mean => slice.iter().sum::<f64>() / window as f64,
            RollingStat::Min => slice.iter().copied().fold(f64::INFINITY, f64::min),
            RollingStat::Max => slice.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };
    }

    result
}

fn extract(bars: &[Bar], source: SeriesSource) -> Vec<f64> {
    match source {
        SeriesSource::Close => bars.iter().map(|b| b.close).collect(),
        SeriesSource::Volume => bars.iter().map(|b| b.volume).collect(),
    }
}

/// Rolling minimum of close prices.
#[derive(Debug, Clone)]
pub struct RollingMin {
    window: usize,
    name: String,
}

impl RollingMin {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self {
            window,
            name: format!("min_{window}"),
        }
    }
}

impl Indicator for RollingMin {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_stat(
            &extract(bars, SeriesSource::Close),
            self.window,
            RollingStat::Min,
        )
    }
}

/// Rolling maximum of close prices.
#[derive(Debug, Clone)]
pub struct RollingMax {
    window: usize,
    name: String,
}

impl RollingMax {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self {
            window,
            name: format!("max_{window}"),
        }
    }
}

impl Indicator for RollingMax {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_stat(
            &extract(bars, SeriesSource::Close),
            self.window,
            RollingStat::Max,
        )
    }
}

/// Rolling mean of a selectable base series (close or volume).
#[derive(Debug, Clone)]
pub struct RollingMean {
    source: SeriesSource,
    window: usize,
    name: String,
}

impl RollingMean {
    pub fn of_close(window: usize) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self {
            source: SeriesSource::Close,
            window,
            name: format!("mean_{window}"),
        }
    }

    pub fn of_volume(window: usize) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self {
            source: SeriesSource::Volume,
            window,
            name: format!("volmean_{window}"),
        }
    }
}

impl Indicator for RollingMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_stat(&extract(bars, self.source), self.window, RollingStat::Mean)
    }
}
