//! EMA skip-pump strategy.
//!
//! Buys weakness (close under a lower Bollinger band or a short EMA) while
//! a volume guard skips pump candles: the current volume must stay under
//! twenty times the previous bar's rolling volume mean. Band windows are
//! fixed at 20; the guard's mean window is tunable.

use siglab_core::conditions::{
    Catalog, ConditionSet, Guard, Operand, Predicate, SignalError, Trigger, Window,
};
use siglab_core::domain::{Bar, Frame, SeriesSource};
use siglab_core::indicators::{
    Bollinger, Ema, Indicator, RollingMax, RollingMin, RollingStat,
};
use siglab_core::mask::{combine, SignalMask};
use siglab_core::params::{Assignment, Dimension, SearchSpace};
use siglab_core::roi::RoiTable;
use siglab_core::strategy::{default_roi_space, stoploss_space_between, Hyperoptable, Strategy};

const EMA_SHORT_TERM: usize = 5;
const EMA_MEDIUM_TERM: usize = 12;
const EMA_LONG_TERM: usize = 21;
const BAND_WINDOW: usize = 20;

/// The pump guard: volume below `factor` times the previous bar's rolling
/// volume mean. The window is either fixed (fixed path) or a parameter.
fn pump_guard_rule(window: Window) -> Predicate {
    Predicate::Lt(
        Operand::Volume,
        Operand::scaled(
            Operand::Rolling {
                source: SeriesSource::Volume,
                stat: RollingStat::Mean,
                window,
                shift: 1,
            },
            20.0,
        ),
    )
}

pub struct EmaSkipPump;

impl EmaSkipPump {
    fn fixed_entry() -> ConditionSet {
        ConditionSet::fixed(vec![
            ("volume_not_pumping", pump_guard_rule(Window::Fixed(30))),
            (
                "close_under_short_ema",
                Predicate::Lt(Operand::Close, Operand::col("ema_5")),
            ),
            (
                "close_under_medium_ema",
                Predicate::Lt(Operand::Close, Operand::col("ema_12")),
            ),
            (
                "close_at_short_min",
                Predicate::Eq(Operand::Close, Operand::col("min_short")),
            ),
            (
                "close_under_lower_band",
                Predicate::Le(Operand::Close, Operand::col("bb_lowerband2")),
            ),
        ])
    }

    fn fixed_exit() -> ConditionSet {
        ConditionSet::fixed(vec![
            (
                "close_over_short_ema",
                Predicate::Gt(Operand::Close, Operand::col("ema_5")),
            ),
            (
                "close_over_medium_ema",
                Predicate::Gt(Operand::Close, Operand::col("ema_12")),
            ),
            (
                "close_at_short_max",
                Predicate::Ge(Operand::Close, Operand::col("max_short")),
            ),
            (
                "close_over_middle_band",
                Predicate::Ge(Operand::Close, Operand::col("bb_middleband2")),
            ),
        ])
    }
}

impl Strategy for EmaSkipPump {
    fn name(&self) -> &str {
        "ema_skip_pump"
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
        let ema_5 = Ema::new(EMA_SHORT_TERM).compute(&bars);
        let ema_12 = Ema::new(EMA_MEDIUM_TERM).compute(&bars);
        let ema_21 = Ema::new(EMA_LONG_TERM).compute(&bars);

        let bb_lower2 = Bollinger::lower(BAND_WINDOW, 2.0).compute(&bars);
        let bb_middle2 = Bollinger::middle(BAND_WINDOW, 2.0).compute(&bars);
        let bb_upper2 = Bollinger::upper(BAND_WINDOW, 2.0).compute(&bars);
        let bb_lower3 = Bollinger::lower(BAND_WINDOW, 3.0).compute(&bars);
        let bb_upper3 = Bollinger::upper(BAND_WINDOW, 3.0).compute(&bars);
        let bb_lower4 = Bollinger::lower(BAND_WINDOW, 4.0).compute(&bars);

        let min_short = RollingMin::new(EMA_SHORT_TERM).compute(&bars);
        let max_short = RollingMax::new(EMA_SHORT_TERM).compute(&bars);
        let min_medium = RollingMin::new(EMA_MEDIUM_TERM).compute(&bars);
        let max_medium = RollingMax::new(EMA_MEDIUM_TERM).compute(&bars);
        let min_long = RollingMin::new(EMA_LONG_TERM).compute(&bars);
        let max_long = RollingMax::new(EMA_LONG_TERM).compute(&bars);

        let mut frame = Frame::new(bars);
        frame.insert_column("ema_5", ema_5);
        frame.insert_column("ema_12", ema_12);
        frame.insert_column("ema_21", ema_21);
        frame.insert_column("bb_lowerband2", bb_lower2);
        frame.insert_column("bb_middleband2", bb_middle2);
        frame.insert_column("bb_upperband2", bb_upper2);
        frame.insert_column("bb_lowerband3", bb_lower3);
        frame.insert_column("bb_upperband3", bb_upper3);
        frame.insert_column("bb_lowerband4", bb_lower4);
        frame.insert_column("min_short", min_short);
        frame.insert_column("max_short", max_short);
        frame.insert_column("min_medium", min_medium);
        frame.insert_column("max_medium", max_medium);
        frame.insert_column("min_long", min_long);
        frame.insert_column("max_long", max_long);
        frame
    }

    fn entry_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_entry(), frame, &Assignment::new())
    }

    fn exit_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_exit(), frame, &Assignment::new())
    }
}

impl Hyperoptable for EmaSkipPump {
    fn entry_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("volume-value".into(), Dimension::Int { lo: 5, hi: 40 }),
            ("volume-enabled".into(), Dimension::Toggle),
            (
                "trigger".into(),
                Dimension::Choice(vec![
                    "bb_lower2".into(),
                    "bb_lower3".into(),
                    "bb_lower4".into(),
                    "emaShort".into(),
                    "emaMedium".into(),
                    "emaLong".into(),
                ]),
            ),
        ])
        .expect("entry space is duplicate-free")
    }

    fn exit_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("sell-shortEMA-enabled".into(), Dimension::Toggle),
            ("sell-mediumEMA-enabled".into(), Dimension::Toggle),
            (
                "trigger".into(),
                Dimension::Choice(vec![
                    "bb_lower2".into(),
                    "bb_middle2".into(),
                    "bb_upper2".into(),
                    "bb_upper3".into(),
                    "emaShort".into(),
                    "emaMedium".into(),
                    "emaLong".into(),
                ]),
            ),
        ])
        .expect("exit space is duplicate-free")
    }

    fn roi_space(&self) -> SearchSpace {
        default_roi_space()
    }

    fn stoploss_space(&self) -> SearchSpace {
        stoploss_space_between(-0.3, -0.001)
    }

    fn entry_catalog(&self) -> Catalog {
        Catalog::new(
            vec![Guard {
                enable: "volume-enabled".into(),
                rule: pump_guard_rule(Window::Param("volume-value".into())),
            }],
            "trigger",
            vec![
                Trigger {
                    value: "bb_lower2".into(),
                    rule: Predicate::Le(Operand::Close, Operand::col("bb_lowerband2")),
                },
                Trigger {
                    value: "bb_lower3".into(),
                    rule: Predicate::Le(Operand::Close, Operand::col("bb_lowerband3")),
                },
                Trigger {
                    value: "bb_lower4".into(),
                    rule: Predicate::Le(Operand::Close, Operand::col("bb_lowerband4")),
                },
                Trigger {
                    value: "emaShort".into(),
                    rule: Predicate::Lt(Operand::Close, Operand::col("ema_5")),
                },
                Trigger {
                    value: "emaMedium".into(),
                    rule: Predicate::Lt(Operand::Close, Operand::col("ema_12")),
                },
                Trigger {
                    value: "emaLong".into(),
                    rule: Predicate::Lt(Operand::Close, Operand::col("ema_21")),
                },
            ],
        )
    }

    // The exit side declares two EMA toggles that no exit rule reads; they
    // are kept in the declared space so an optimizer explores the same
    // space the module has always declared. The exit selector shares the
    // entry side's "trigger" name.
    //
    // The ema* exit comparisons point the same way as the entry side's; the
    // asymmetry is the module's documented behavior, not a transcription
    // slip.
    fn exit_catalog(&self) -> Catalog {
        Catalog::new(
            vec![],
            "trigger",
            vec![
                Trigger {
                    value: "bb_lower2".into(),
                    rule: Predicate::Ge(Operand::Close, Operand::col("bb_lowerband2")),
                },
                Trigger {
                    value: "bb_middle2".into(),
                    rule: Predicate::Ge(Operand::Close, Operand::col("bb_middleband2")),
                },
                Trigger {
                    value: "bb_upper2".into(),
                    rule: Predicate::Ge(Operand::Close, Operand::col("bb_upperband2")),
                },
                Trigger {
                    value: "bb_upper3".into(),
                    rule: Predicate::Ge(Operand::Close, Operand::col("bb_upperband3")),
                },
                Trigger {
                    value: "emaShort".into(),
                    rule: Predicate::Lt(Operand::Close, Operand::col("ema_5")),
                },
                Trigger {
                    value: "emaMedium".into(),
                    rule: Predicate::Lt(Operand::Close, Operand::col("ema_12")),
                },
                Trigger {
                    value: "emaLong".into(),
                    rule: Predicate::Lt(Operand::Close, Operand::col("ema_21")),
                },
            ],
        )
    }
}
