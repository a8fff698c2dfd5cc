//! Rockwell MACD strategy.
//!
//! Uptrend entry: MACD above the zero line and above its signal line.
//! Exit: MACD below its signal line. The hyperopt surface makes the zero
//! line a tunable threshold and the signal-line comparison a trigger.

use siglab_core::conditions::{
    Catalog, ConditionSet, Guard, Operand, Predicate, SignalError, Trigger,
};
use siglab_core::domain::{Bar, Frame};
use siglab_core::indicators::{Indicator, Macd};
use siglab_core::mask::{combine, SignalMask};
use siglab_core::params::{Assignment, Dimension, SearchSpace};
use siglab_core::roi::RoiTable;
use siglab_core::strategy::{default_roi_space, stoploss_space_between, Hyperoptable, Strategy};

pub struct Rockwell;

impl Rockwell {
    fn fixed_entry() -> ConditionSet {
        ConditionSet::fixed(vec![
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
        ConditionSet::fixed(vec![(
            "macd_below_signal",
            Predicate::Lt(Operand::col("macd"), Operand::col("macdsignal")),
        )])
    }
}

impl Strategy for Rockwell {
    fn name(&self) -> &str {
        "rockwell"
    }

    fn timeframe(&self) -> &str {
        "5m"
    }

    fn minimal_roi(&self) -> RoiTable {
        RoiTable::from_steps([(0, 0.10), (42, 0.102), (136, 0.0316), (214, 0.0)])
    }

    fn stoploss(&self) -> f64 {
        -0.05
    }

    fn populate_indicators(&self, bars: Vec<Bar>) -> Frame {
        let macd = Macd::default_line().compute(&bars);
        let signal = Macd::default_signal().compute(&bars);
        let hist = Macd::default_histogram().compute(&bars);

        let mut frame = Frame::new(bars);
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

impl Hyperoptable for Rockwell {
    fn entry_space(&self) -> SearchSpace {
        SearchSpace::new(vec![
            ("macd-value".into(), Dimension::Int { lo: 0, hi: 50 }),
            ("macd-enabled".into(), Dimension::Toggle),
            (
                "trigger".into(),
                Dimension::Choice(vec!["macd_signal".into()]),
            ),
        ])
        .expect("entry space is duplicate-free")
    }

    fn exit_space(&self) -> SearchSpace {
        SearchSpace::new(vec![(
            "sell-trigger".into(),
            Dimension::Choice(vec!["macd_signal".into()]),
        )])
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
                enable: "macd-enabled".into(),
                rule: Predicate::Gt(Operand::col("macd"), Operand::param("macd-value")),
            }],
            "trigger",
            vec![Trigger {
                value: "macd_signal".into(),
                rule: Predicate::Gt(Operand::col("macd"), Operand::col("macdsignal")),
            }],
        )
    }

    fn exit_catalog(&self) -> Catalog {
        Catalog::new(
            vec![],
            "sell-trigger",
            vec![Trigger {
                value: "macd_signal".into(),
                rule: Predicate::Lt(Operand::col("macd"), Operand::col("macdsignal")),
            }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_bars;
    use siglab_core::params::ParamValue;

    /// Frame with hand-written MACD columns for exact rule pinning.
    fn crafted_frame() -> Frame {
        let mut frame = Frame::new(make_bars(&[100.0, 99.0, 101.0, 102.0, 103.0]));
        frame.insert_column("macd", vec![-1.0, -1.0, 1.0, 2.0, 3.0]);
        frame.insert_column("macdsignal", vec![0.0, 0.0, 0.0, 1.0, 2.0]);
        frame.insert_column("macdhist", vec![-1.0, -1.0, 1.0, 1.0, 1.0]);
        frame
    }

    #[test]
    fn fixed_entry_is_macd_above_zero_and_signal() {
        let mask = Rockwell.entry_signal(&crafted_frame()).unwrap();
        assert_eq!(mask.rows(), &[false, false, true, true, true]);
    }

    #[test]
    fn fixed_exit_is_macd_below_signal() {
        let mask = Rockwell.exit_signal(&crafted_frame()).unwrap();
        assert_eq!(mask.rows(), &[true, true, false, false, false]);
    }

    #[test]
    fn hyperopt_entry_matches_fixed_rules_at_zero_threshold() {
        let assignment = Assignment::new()
            .with("macd-enabled", ParamValue::Toggle(true))
            .with("macd-value", ParamValue::Int(0))
            .with("trigger", ParamValue::Choice("macd_signal".into()));
        let mask = Rockwell.entry_mask(&crafted_frame(), &assignment).unwrap();
        assert_eq!(mask.rows(), &[false, false, true, true, true]);
    }

    #[test]
    fn hyperopt_threshold_tightens_entries() {
        let assignment = Assignment::new()
            .with("macd-enabled", ParamValue::Toggle(true))
            .with("macd-value", ParamValue::Int(2))
            .with("trigger", ParamValue::Choice("macd_signal".into()));
        let mask = Rockwell.entry_mask(&crafted_frame(), &assignment).unwrap();
        // Only the final row clears macd > 2.
        assert_eq!(mask.rows(), &[false, false, false, false, true]);
    }

    #[test]
    fn absent_guard_leaves_trigger_alone() {
        let assignment =
            Assignment::new().with("trigger", ParamValue::Choice("macd_signal".into()));
        let mask = Rockwell.entry_mask(&crafted_frame(), &assignment).unwrap();
        // Trigger only: macd > macdsignal.
        assert_eq!(mask.rows(), &[false, false, true, true, true]);
    }

    #[test]
    fn out_of_domain_threshold_is_rejected() {
        let assignment = Assignment::new()
            .with("macd-enabled", ParamValue::Toggle(true))
            .with("macd-value", ParamValue::Int(99));
        assert!(Rockwell.entry_mask(&crafted_frame(), &assignment).is_err());
    }

    #[test]
    fn populate_computes_macd_columns() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        let frame = Rockwell.populate_indicators(make_bars(&closes));
        assert!(frame.has_column("macd"));
        assert!(frame.has_column("macdsignal"));
        assert!(frame.has_column("macdhist"));
        // Steady uptrend: the fixed entry fires once warmup has passed.
        let mask = Rockwell.entry_signal(&frame).unwrap();
        assert_eq!(mask.len(), 60);
        assert!(mask.get(59));
    }

    #[test]
    fn roi_and_stoploss_literals() {
        let roi = Rockwell.minimal_roi();
        assert_eq!(roi.len(), 4);
        assert_eq!(roi.required_at(200), Some(0.0316));
        assert_eq!(roi.required_at(250), Some(0.0));
        assert_eq!(Rockwell.stoploss(), -0.05);
        assert_eq!(Rockwell.timeframe(), "5m");
    }
}
