//! EMA crossover strategy with a volume confirmation guard.
//!
//! Entry follows an EMA pair crossing above (7/21, 13/34 or 50/200) with
//! volume above its rolling mean; exit mirrors the cross downward, with an
//! optional RSI overbought guard.

use siglab_core::conditions::{
    Catalog, ConditionSet, Guard, Operand, Predicate, SignalError, Trigger, Window,
};
use siglab_core::domain::{Bar, Frame, SeriesSource};
use siglab_core::indicators::{Ema, Indicator, RollingMean, RollingStat, Rsi};
use siglab_core::mask::{combine, SignalMask};
use siglab_core::params::{Assignment, Dimension, SearchSpace};
use siglab_core::roi::RoiTable;
use siglab_core::strategy::{stoploss_space_between, Hyperoptable, Strategy};

const VOLUME_MEAN_WINDOW: usize = 10;

fn crossed_up(fast: &str, slow: &str) -> Predicate {
    Predicate::CrossedAbove(Operand::col(fast), Operand::col(slow))
}

fn crossed_down(fast: &str, slow: &str) -> Predicate {
    Predicate::CrossedBelow(Operand::col(fast), Operand::col(slow))
}

pub struct EmaVolume;

impl EmaVolume {
    fn fixed_entry() -> ConditionSet {
        ConditionSet::fixed(vec![
            ("ema_13_34_crossover", crossed_up("ema13", "ema34")),
            (
                "volume_above_mean",
                Predicate::Gt(Operand::Volume, Operand::col("volume-mean")),
            ),
        ])
    }

    fn fixed_exit() -> ConditionSet {
        ConditionSet::fixed(vec![(
            "ema_13_34_crossunder",
            crossed_down("ema13", "ema34"),
        )])
    }
}

impl Strategy for EmaVolume {
    fn name(&self) -> &str {
        "ema_volume"
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
        let ema7 = Ema::new(7).compute(&bars);
        let ema13 = Ema::new(13).compute(&bars);
        let ema21 = Ema::new(21).compute(&bars);
        let ema34 = Ema::new(34).compute(&bars);
        let ema50 = Ema::new(50).compute(&bars);
        let ema200 = Ema::new(200).compute(&bars);
        let volume_mean = RollingMean::of_volume(VOLUME_MEAN_WINDOW).compute(&bars);
        let rsi = Rsi::new(14).compute(&bars);

        let mut frame = Frame::new(bars);
        frame.insert_column("ema7", ema7);
        frame.insert_column("ema13", ema13);
        frame.insert_column("ema21", ema21);
        frame.insert_column("ema34", ema34);
        frame.insert_column("ema50", ema50);
        frame.insert_column("ema200", ema200);
        frame.insert_column("volume-mean", volume_mean);
        frame.insert_column("rsi", rsi);
        frame
    }

    fn entry_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_entry(), frame, &Assignment::new())
    }

    fn exit_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError> {
        combine(&Self::fixed_exit(), frame, &Assignment::new())
    }
}

impl Hyperoptable for EmaVolume {
    fn entry_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("volume-window".into(), Dimension::Int { lo: 5, hi: 30 }),
            ("volume-enabled".into(), Dimension::Toggle),
            ("ema_7_21-enabled".into(), Dimension::Toggle),
            ("ema_13_34-enabled".into(), Dimension::Toggle),
            ("ema_50_200-enabled".into(), Dimension::Toggle),
            (
                "trigger".into(),
                Dimension::Choice(vec![
                    "volume".into(),
                    "ema_7_21_crossover".into(),
                    "ema_13_34_crossover".into(),
                    "ema_50_200_crossover".into(),
                ]),
            ),
        ])
        .expect("entry space is duplicate-free")
    }

    fn exit_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("sell-rsi-value".into(), Dimension::Int { lo: 30, hi: 100 }),
            ("sell-rsi-enabled".into(), Dimension::Toggle),
            (
                "sell-trigger".into(),
                Dimension::Choice(vec![
                    "sell-ema_7_21".into(),
                    "sell-ema_13_34".into(),
                    "sell-ema_50_200".into(),
                ]),
            ),
        ])
        .expect("exit space is duplicate-free")
    }

    fn roi_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("roi_t1".into(), Dimension::Int { lo: 10, hi: 120 }),
            ("roi_t2".into(), Dimension::Int { lo: 10, hi: 60 }),
            ("roi_t3".into(), Dimension::Int { lo: 10, hi: 40 }),
            ("roi_p1".into(), Dimension::Real { lo: 0.01, hi: 0.04 }),
            ("roi_p2".into(), Dimension::Real { lo: 0.01, hi: 0.07 }),
            ("roi_p3".into(), Dimension::Real { lo: 0.01, hi: 0.20 }),
        ])
        .expect("roi space is duplicate-free")
    }

    fn stoploss_space(&self) -> SearchSpace {
        stoploss_space_between(-0.5, -0.02)
    }

    // The guard named for the 7/21 pair evaluates the 13/34 cross; the
    // module has always shipped that way and tuned assignments depend on it.
    fn entry_catalog(&self) -> Catalog {
        Catalog::new(
            vec![
                Guard {
                    enable: "volume-enabled".into(),
                    rule: Predicate::Gt(
                        Operand::Volume,
                        Operand::Rolling {
                            source: SeriesSource::Volume,
                            stat: RollingStat::Mean,
                            window: Window::Param("volume-window".into()),
                            shift: 0,
                        },
                    ),
                },
                Guard {
                    enable: "ema_7_21-enabled".into(),
                    rule: crossed_up("ema13", "ema34"),
                },
                Guard {
                    enable: "ema_13_34-enabled".into(),
                    rule: crossed_up("ema13", "ema34"),
                },
                Guard {
                    enable: "ema_50_200-enabled".into(),
                    rule: crossed_up("ema50", "ema200"),
                },
            ],
            "trigger",
            vec![
                Trigger {
                    value: "volume".into(),
                    rule: Predicate::Gt(Operand::Volume, Operand::col("volume-mean")),
                },
                Trigger {
                    value: "ema_7_21_crossover".into(),
                    rule: crossed_up("ema7", "ema21"),
                },
                Trigger {
                    value: "ema_13_34_crossover".into(),
                    rule: crossed_up("ema13", "ema34"),
                },
                Trigger {
                    value: "ema_50_200_crossover".into(),
                    rule: crossed_up("ema50", "ema200"),
                },
            ],
        )
    }

    // The 7/21 exit trigger crosses *above*, unlike its two siblings; that
    // direction is the module's shipped behavior.
    fn exit_catalog(&self) -> Catalog {
        Catalog::new(
            vec![Guard {
                enable: "sell-rsi-enabled".into(),
                rule: Predicate::Gt(Operand::col("rsi"), Operand::param("sell-rsi-value")),
            }],
            "sell-trigger",
            vec![
                Trigger {
                    value: "sell-ema_7_21".into(),
                    rule: crossed_up("ema7", "ema21"),
                },
                Trigger {
                    value: "sell-ema_13_34".into(),
                    rule: crossed_down("ema13", "ema34"),
                },
                Trigger {
                    value: "sell-ema_50_200".into(),
                    rule: crossed_down("ema50", "ema200"),
                },
            ],
        )
    }
}
