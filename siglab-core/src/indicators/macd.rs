//! MACD — Moving Average Convergence/Divergence.
//!
//! Line: EMA(close, fast) - EMA(close, slow).
//! Signal: EMA(line, signal_period), seeded after the line's warmup.
//! Histogram: line - signal.
//!
//! Three outputs as separate named instances, one column each.

use crate::domain::Bar;

use super::ema::ema_series;
use super::Indicator;

/// Which MACD output to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdOutput {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    output: MacdOutput,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdOutput::Line, "macd")
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdOutput::Signal, "macdsignal")
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdOutput::Histogram, "macdhist")
    }

    /// The conventional 12/26/9 parameterization.
    pub fn default_line() -> Self {
        Self::line(12, 26, 9)
    }

    pub fn default_signal() -> Self {
        Self::signal(12, 26, 9)
    }

    pub fn default_histogram() -> Self {
        Self::histogram(12, 26, 9)
    }

    fn build(fast: usize, slow: usize, signal: usize, output: MacdOutput, tag: &str) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be < slow period");
        Self {
            fast,
            slow,
            signal,
            output,
            name: format!("{tag}_{fast}_{slow}_{signal}"),
        }
    }

    fn line_series(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ema_series(closes, self.fast);
        let slow = ema_series(closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.output {
            MacdOutput::Line => self.slow - 1,
            MacdOutput::Signal | MacdOutput::Histogram => self.slow - 1 + self.signal - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let line = self.line_series(&closes);
        match self.output {
            MacdOutput::Line => line,
            MacdOutput::Signal => ema_series(&line, self.signal),
            MacdOutput::Histogram => {
                let signal = ema_series(&line, self.signal);
                line.iter().zip(&signal).map(|(l, s)| l - s).collect()
            }
        }
    }
}
