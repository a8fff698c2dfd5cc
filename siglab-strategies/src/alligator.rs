//! Alligator strategy — SMA jaw opening with MACD confirmation.
//!
//! Entry when the short SMA crosses above the medium SMA ("opening jaw")
//! while MACD confirms the trend; exit when price falls back under the
//! medium SMA with MACD under its signal line ("closing jaw").

use siglab_core::conditions::{
    Catalog, ConditionSet, Guard, Operand, Predicate, SignalError, Trigger,
};
use siglab_core::domain::{Bar, Frame};
use siglab_core::indicators::{Indicator, Macd, Sma};
use siglab_core::mask::{combine, SignalMask};
use siglab_core::params::{Assignment, Dimension, SearchSpace};
use siglab_core::roi::RoiTable;
use siglab_core::strategy::{default_roi_space, stoploss_space_between, Hyperoptable, Strategy};

const SMA_SHORT: usize = 5;
const SMA_MEDIUM: usize = 8;
const SMA_LONG: usize = 13;

pub struct Alligator;

impl Alligator {
    fn fixed_entry() -> ConditionSet {
        ConditionSet::fixed(vec![
            (
                "opening_jaw",
                Predicate::CrossedAbove(Operand::col("SMAShort"), Operand::col("SMAMedium")),
            ),
            (
                "macd_above_zero",
                Predicate::Gt(Operand::col("macd"), Operand::Const(0.0)),
            ),
            (
                "macd_above_signal",
                Predicate::Gt(Operand::col("macd"), Operand::col("macdsignal")),
            ),
        ])
    }

    fn fixed_exit() -> ConditionSet {
        ConditionSet::fixed(vec![
            (
                "closing_jaw",
                Predicate::Lt(Operand::Close, Operand::col("SMAMedium")),
            ),
            (
                "macd_below_signal",
                Predicate::Lt(Operand::col("macd"), Operand::col("macdsignal")),
            ),
        ])
    }
}

impl Strategy for Alligator {
    fn name(&self) -> &str {
        "alligator"
    }

    fn timeframe(&self) -> &str {
        "5m"
    }

    fn minimal_roi(&self) -> RoiTable {
        crate::default_roi()
    }

    fn stoploss(&self) -> f64 {
        crate::DEFAULT_STOPLOSS
    }

    fn populate_indicators(&self, bars: Vec<Bar>) -> Frame {
        let sma_short = Sma::new(SMA_SHORT).compute(&bars);
        let sma_medium = Sma::new(SMA_MEDIUM).compute(&bars);
        let sma_long = Sma::new(SMA_LONG).compute(&bars);
        let macd = Macd::default_line().compute(&bars);
        let signal = Macd::default_signal().compute(&bars);
        let hist = Macd::default_histogram().compute(&bars);

        let mut frame = Frame::new(bars);
        frame.insert_column("SMAShort", sma_short);
        frame.insert_column("SMAMedium", sma_medium);
        frame.insert_column("SMALong", sma_long);
        frame.insert_column("macd", macd);
        frame.insert_column("macdsignal", signal);
        frame.insert_column("macdhist", hist);
        frame
    }

    fn entry_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_entry(), frame, &Assignment::new())
    }

    fn exit_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_exit(), frame, &Assignment::new())
    }
}

impl Hyperoptable for Alligator {
    fn entry_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("macd-enabled".into(), Dimension::Toggle),
            ("macd-signal-enabled".into(), Dimension::Toggle),
            (
                "trigger".into(),
                Dimension::Choice(vec!["opening_jaw".into()]),
            ),
        ])
        .expect("entry space is duplicate-free")
    }

    fn exit_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("sell-macd-enabled".into(), Dimension::Toggle),
            (
                "sell-trigger".into(),
                Dimension::Choice(vec!["closing_jaw".into()]),
            ),
        ])
        .expect("exit space is duplicate-free")
    }

    fn roi_space(&self) -> SearchSpace {
        default_roi_space()
    }

    fn stoploss_space(&self) -> SearchSpace {
        stoploss_space_between(-0.5, -0.005)
    }

    fn entry_catalog(&self) -> Catalog {
        Catalog::new(
            vec![
                Guard {
                    enable: "macd-enabled".into(),
                    rule: Predicate::Gt(Operand::col("macd"), Operand::Const(0.0)),
                },
                Guard {
                    enable: "macd-signal-enabled".into(),
                    rule: Predicate::Gt(Operand::col("macd"), Operand::col("macdsignal")),
                },
            ],
            "trigger",
            vec![Trigger {
                value: "opening_jaw".into(),
                rule: Predicate::CrossedAbove(Operand::col("SMAShort"), Operand::col("SMAMedium")),
            }],
        )
    }

    fn exit_catalog(&self) -> Catalog {
        Catalog::new(
            vec![Guard {
                enable: "sell-macd-enabled".into(),
                rule: Predicate::Lt(Operand::col("macd"), Operand::col("macdsignal")),
            }],
            "sell-trigger",
            vec![Trigger {
                value: "closing_jaw".into(),
                rule: Predicate::Lt(Operand::Close, Operand::col("SMAMedium")),
            }],
        )
    }
}
