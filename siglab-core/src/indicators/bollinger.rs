//! Bollinger Bands — rolling mean of typical price +/- stddev multiplier.
//!
//! Three bands (separate instances):
//! - Middle: mean(typical_price, window)
//! - Upper: middle + stds * stddev
//! - Lower: middle - stds * stddev
//!
//! Computed over typical price (hlc3), population stddev.
//! Lookback: window - 1.

use crate::domain::Bar;

use super::Indicator;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
    stds: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(window: usize, stds: f64) -> Self {
        Self::build(window, stds, BollingerBand::Upper, "bb_upper")
    }

    pub fn middle(window: usize, stds: f64) -> Self {
        Self::build(window, stds, BollingerBand::Middle, "bb_middle")
    }

    pub fn lower(window: usize, stds: f64) -> Self {
        Self::build(window, stds, BollingerBand::Lower, "bb_lower")
    }

    fn build(window: usize, stds: f64, band: BollingerBand, tag: &str) -> Self {
        assert!(window >= 1, "Bollinger window must be >= 1");
        Self {
            window,
            stds,
            band,
            name: format!("{tag}_{window}_{stds}"),
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.window {
            return result;
        }

        let typical: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();

        for i in (self.window - 1)..n {
            let window = &typical[(i + 1 - self.window)..=i];
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }
            let mean = window.iter().sum::<f64>() / self.window as f64;

            result[i] = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper | BollingerBand::Lower => {
                    let variance = window
                        .iter()
                        .map(|v| {
                            let diff = v - mean;
                            diff * diff
                        })
                        .sum::<f64>()
                        / self.window as f64;
                    let stddev = variance.sqrt();
                    match self.band {
                        BollingerBand::Upper => mean + self.stds * stddev,
                        BollingerBand::Lower => mean - self.stds * stddev,
                        BollingerBand::Middle => unreachable!(),
                    }
                }
            };
        }

        result
    }
}
