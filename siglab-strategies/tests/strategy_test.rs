//! Cross-module integration: every hyperopt surface tolerates every
//! combinatorially possible assignment drawn from its declared spaces.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use siglab_core::domain::Bar;
use siglab_strategies::{all_hyperoptable, all_strategies, find_hyperoptable, find_strategy};

fn make_bars(n: usize) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2021, 3, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.11).sin() * 4.0 + (i as f64 * 0.013).cos();
            Bar {
                timestamp: base + chrono::Duration::minutes(5 * i as i64),
                open: close - 0.1,
                high: close + 1.0,
                low: close - 1.1,
                close,
                volume: 1000.0 + (i % 89) as f64 * 10.0,
            }
        })
        .collect()
}

#[test]
fn registry_contains_all_modules() {
    let names: Vec<String> = all_strategies()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    for expected in ["rockwell", "ema_skip_pump", "ema_volume", "alligator", "bband_rsi"] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }
    assert_eq!(all_hyperoptable().len(), 4);
}

#[test]
fn fixed_paths_run_on_every_module() {
    let bars = make_bars(300);
    for strategy in all_strategies() {
        let frame = strategy.populate_indicators(bars.clone());
        let entry = strategy
            .entry_signal(&frame)
            .unwrap_or_else(|e| panic!("{} entry failed: {e}", strategy.name()));
        let exit = strategy
            .exit_signal(&frame)
            .unwrap_or_else(|e| panic!("{} exit failed: {e}", strategy.name()));
        assert_eq!(entry.len(), frame.len());
        assert_eq!(exit.len(), frame.len());
        assert!(strategy.stoploss() < 0.0);
        assert!(!strategy.minimal_roi().is_empty());
    }
}

#[test]
fn every_sampled_assignment_evaluates_without_error() {
    let bars = make_bars(300);
    let mut rng = StdRng::seed_from_u64(42);

    for strategy in all_hyperoptable() {
        let frame = strategy.populate_indicators(bars.clone());
        for _ in 0..50 {
            let entry = strategy.entry_space().sample(&mut rng);
            let exit = strategy.exit_space().sample(&mut rng);
            let roi = strategy.roi_space().sample(&mut rng);

            let entry_mask = strategy
                .entry_mask(&frame, &entry)
                .unwrap_or_else(|e| panic!("{} entry_mask failed: {e}", strategy.name()));
            let exit_mask = strategy
                .exit_mask(&frame, &exit)
                .unwrap_or_else(|e| panic!("{} exit_mask failed: {e}", strategy.name()));
            assert_eq!(entry_mask.len(), frame.len());
            assert_eq!(exit_mask.len(), frame.len());

            let table = strategy
                .roi_table(&roi)
                .unwrap_or_else(|e| panic!("{} roi_table failed: {e}", strategy.name()));
            assert!(!table.is_empty());
        }
    }
}

#[test]
fn stoploss_spaces_are_negative_ranges() {
    let mut rng = StdRng::seed_from_u64(7);
    for strategy in all_hyperoptable() {
        let space = strategy.stoploss_space();
        assert_eq!(space.len(), 1);
        for _ in 0..20 {
            let assignment = space.sample(&mut rng);
            let stoploss = assignment.real("stoploss").unwrap();
            assert!(stoploss < 0.0, "{} sampled stoploss {stoploss}", strategy.name());
        }
    }
}

#[test]
fn same_assignment_same_mask() {
    let bars = make_bars(200);
    let strategy = find_hyperoptable("ema_volume").unwrap();
    let frame = strategy.populate_indicators(bars);

    let mut rng = StdRng::seed_from_u64(99);
    let assignment = strategy.entry_space().sample(&mut rng);
    let first = strategy.entry_mask(&frame, &assignment).unwrap();
    let second = strategy.entry_mask(&frame, &assignment).unwrap();
    assert_eq!(first, second);
}

#[test]
fn masks_from_different_passes_union_additively() {
    let bars = make_bars(200);
    let strategy = find_strategy("rockwell").unwrap();
    let frame = strategy.populate_indicators(bars);

    let entry = strategy.entry_signal(&frame).unwrap();
    let exit = strategy.exit_signal(&frame).unwrap();
    let merged = entry.union(&exit);
    assert!(merged.count() >= entry.count());
    assert!(merged.count() >= exit.count());
}
