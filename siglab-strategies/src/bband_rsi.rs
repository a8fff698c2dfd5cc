//! Bollinger + RSI mean-reversion strategy (daily bars, fixed rules only).
//!
//! Entry: oversold RSI with price holding above the 3-sigma lower band.
//! Exit: overbought RSI with price above the middle band.

use siglab_core::conditions::{ConditionSet, Operand, Predicate, SignalError};
use siglab_core::domain::{Bar, Frame};
use siglab_core::indicators::{Bollinger, Indicator, Rsi};
use siglab_core::mask::{combine, SignalMask};
use siglab_core::params::Assignment;
use siglab_core::roi::RoiTable;
use siglab_core::strategy::Strategy;

const RSI_PERIOD: usize = 14;
const BAND_WINDOW: usize = 20;
const BAND_STDS: f64 = 3.0;

pub struct BbandRsi;

impl BbandRsi {
    fn fixed_entry() -> ConditionSet {
        ConditionSet::fixed(vec![
            (
                "rsi_oversold",
                Predicate::Lt(Operand::col("rsi"), Operand::Const(30.0)),
            ),
            (
                "close_above_lower_band",
                Predicate::Gt(Operand::Close, Operand::col("bb_lowerband")),
            ),
        ])
    }

    fn fixed_exit() -> ConditionSet {
        ConditionSet::fixed(vec![
            (
                "rsi_overbought",
                Predicate::Gt(Operand::col("rsi"), Operand::Const(70.0)),
            ),
            (
                "close_above_middle_band",
                Predicate::Gt(Operand::Close, Operand::col("bb_middleband")),
            ),
        ])
    }
}

impl Strategy for BbandRsi {
    fn name(&self) -> &str {
        "bband_rsi"
    }

    fn timeframe(&self) -> &str {
        "1d"
    }

    fn minimal_roi(&self) -> RoiTable {
        RoiTable::from_steps([(0, 0.07833), (35, 0.03924), (45, 0.01344), (161, 0.0)])
    }

    fn stoploss(&self) -> f64 {
        -0.25
    }

    fn populate_indicators(&self, bars: Vec<Bar>) -> Frame {
        let rsi = Rsi::new(RSI_PERIOD).compute(&bars);
        let lower = Bollinger::lower(BAND_WINDOW, BAND_STDS).compute(&bars);
        let middle = Bollinger::middle(BAND_WINDOW, BAND_STDS).compute(&bars);
        let upper = Bollinger::upper(BAND_WINDOW, BAND_STDS).compute(&bars);

        let mut frame = Frame::new(bars);
        frame.insert_column("rsi", rsi);
        frame.insert_column("bb_lowerband", lower);
        frame.insert_column("bb_middleband", middle);
        frame.insert_column("bb_upperband", upper);
        frame
    }

    fn entry_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_entry(), frame, &Assignment::new())
    }

    fn exit_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_exit(), frame, &Assignment::new())
    }
}
