//! End-to-end composition scenarios: catalog -> compile -> combine.

use chrono::NaiveDate;
use siglab_core::conditions::{compile, Catalog, Guard, Operand, Predicate, Trigger};
use siglab_core::domain::{Bar, Frame};
use siglab_core::mask::combine;
use siglab_core::params::{Assignment, ParamValue};

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

/// The MACD catalog shared by the scenarios below: one threshold guard plus
/// one trigger.
fn macd_catalog() -> Catalog {
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

fn macd_frame() -> Frame {
    let mut frame = Frame::new(make_bars(&[100.0, 99.0, 101.0, 102.0, 103.0]));
    frame.insert_column("macd", vec![-1.0, -1.0, 1.0, 2.0, 3.0]);
    frame.insert_column("macdsignal", vec![0.0, 0.0, 0.0, 1.0, 2.0]);
    frame
}

#[test]
fn guard_and_trigger_compose_into_expected_mask() {
    // macd > 0 AND macd > macdsignal, row by row.
    let assignment = Assignment::new()
        .with("macd-enabled", ParamValue::Toggle(true))
        .with("macd-value", ParamValue::Int(0))
        .with("trigger", ParamValue::Choice("macd_signal".into()));

    let set = compile(&macd_catalog(), &assignment);
    assert_eq!(set.labels(), vec!["macd-enabled", "macd_signal"]);

    let mask = combine(&set, &macd_frame(), &assignment).unwrap();
    assert_eq!(mask.rows(), &[false, false, true, true, true]);
}

#[test]
fn absent_guard_name_never_contributes() {
    // The enable name is wholly absent; only the trigger applies, so rows
    // where macd <= 0 but macd > macdsignal stay unreachable for the guard
    // to veto. The mask is the trigger's series alone.
    let assignment = Assignment::new().with("trigger", ParamValue::Choice("macd_signal".into()));

    let set = compile(&macd_catalog(), &assignment);
    assert_eq!(set.labels(), vec!["macd_signal"]);

    let mask = combine(&set, &macd_frame(), &assignment).unwrap();
    assert_eq!(mask.rows(), &[false, false, true, true, true]);
}

#[test]
fn all_guards_off_and_unmatched_trigger_is_all_false() {
    // Empty-set policy: no active conditions means no signal anywhere,
    // not a crash.
    let assignment = Assignment::new()
        .with("macd-enabled", ParamValue::Toggle(false))
        .with("trigger", ParamValue::Choice("does_not_exist".into()));

    let set = compile(&macd_catalog(), &assignment);
    assert!(set.is_empty());

    let frame = macd_frame();
    let mask = combine(&set, &frame, &assignment).unwrap();
    assert_eq!(mask.len(), frame.len());
    assert_eq!(mask.count(), 0);
}

#[test]
fn missing_indicator_column_fails_the_evaluation() {
    // A frame without the macd columns: the evaluation must error, not
    // quietly produce an all-false mask.
    let frame = Frame::new(make_bars(&[100.0, 101.0]));
    let assignment = Assignment::new()
        .with("macd-enabled", ParamValue::Toggle(true))
        .with("macd-value", ParamValue::Int(0));

    let set = compile(&macd_catalog(), &assignment);
    assert!(combine(&set, &frame, &assignment).is_err());
}

#[test]
fn crossing_trigger_end_to_end() {
    let mut frame = Frame::new(make_bars(&[10.0, 10.0, 10.0]));
    frame.insert_column("ema_fast", vec![1.0, 3.0, 2.0]);
    frame.insert_column("ema_slow", vec![2.0, 2.0, 2.0]);

    let catalog = Catalog::new(
        vec![],
        "trigger",
        vec![Trigger {
            value: "ema_crossover".into(),
            rule: Predicate::CrossedAbove(Operand::col("ema_fast"), Operand::col("ema_slow")),
        }],
    );
    let assignment = Assignment::new().with("trigger", ParamValue::Choice("ema_crossover".into()));

    let mask = combine(&compile(&catalog, &assignment), &frame, &assignment).unwrap();
    assert_eq!(mask.rows(), &[false, true, false]);
}

#[test]
fn recompiling_same_assignment_gives_identical_masks() {
    let assignment = Assignment::new()
        .with("macd-enabled", ParamValue::Toggle(true))
        .with("macd-value", ParamValue::Int(0))
        .with("trigger", ParamValue::Choice("macd_signal".into()));
    let frame = macd_frame();
    let catalog = macd_catalog();

    let first = combine(&compile(&catalog, &assignment), &frame, &assignment).unwrap();
    let second = combine(&compile(&catalog, &assignment), &frame, &assignment).unwrap();
    assert_eq!(first, second);
}
