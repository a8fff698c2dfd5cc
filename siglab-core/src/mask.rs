//! Mask combinator — reduces a condition set to one per-row signal mask.
//!
//! Empty-set policy: an empty `ConditionSet` produces an all-false mask of
//! frame length. No active conditions means "never signal", not a crash —
//! an optimizer is free to sample an assignment with every guard disabled
//! and an unmatched trigger, and that evaluation must complete.

use serde::{Deserialize, Serialize};

use crate::conditions::{ConditionSet, SignalError};
use crate::domain::Frame;
use crate::params::Assignment;

/// Boolean series aligned 1:1 with a frame; true rows carry the signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalMask(Vec<bool>);

impl SignalMask {
    pub fn from_rows(rows: Vec<bool>) -> Self {
        Self(rows)
    }

    pub fn all_false(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rows(&self) -> &[bool] {
        &self.0
    }

    pub fn get(&self, i: usize) -> bool {
        self.0[i]
    }

    /// Number of signal rows.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&v| v).count()
    }

    /// Row-wise OR with another mask of the same length.
    ///
    /// Annotation passes are additive: a row set by an earlier pass is never
    /// cleared by a later one.
    pub fn union(&self, other: &SignalMask) -> SignalMask {
        assert_eq!(self.len(), other.len(), "mask lengths must match");
        SignalMask(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| a || b)
                .collect(),
        )
    }
}

/// Evaluate every condition and AND them row-wise, left to right.
///
/// All condition series are fully materialized before the reduction, so a
/// failing condition surfaces its error even if an earlier series is
/// already all-false.
pub fn combine(
    set: &ConditionSet,
    frame: &Frame,
    assignment: &Assignment,
) -> Result<SignalMask, SignalError> {
    if set.is_empty() {
        return Ok(SignalMask::all_false(frame.len()));
    }

    let mut series = Vec::with_capacity(set.len());
    for condition in &set.0 {
        series.push(condition.rule.evaluate(frame, assignment)?);
    }

    let mut rows = series[0].clone();
    for s in &series[1..] {
        for (row, &v) in rows.iter_mut().zip(s) {
            *row = *row && v;
        }
    }
    Ok(SignalMask(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{Condition, Operand, Predicate};
    use crate::indicators::make_bars;

    /// A condition set whose rules reproduce the given boolean rows against
    /// a synthetic frame (close > 0 is true, close > 1e9 is false).
    fn frame_and_set(patterns: &[&[bool]]) -> (Frame, ConditionSet) {
        let n = patterns.first().map_or(3, |p| p.len());
        let mut frame = Frame::new(make_bars(&vec![10.0; n]));
        let mut conditions = Vec::new();
        for (ci, pattern) in patterns.iter().enumerate() {
            let name = format!("c{ci}");
            let values = pattern
                .iter()
                .map(|&b| if b { 1.0 } else { -1.0 })
                .collect();
            frame.insert_column(&name, values);
            conditions.push(Condition {
                label: name.clone(),
                rule: Predicate::Gt(Operand::col(name), Operand::Const(0.0)),
            });
        }
        (frame, ConditionSet::new(conditions))
    }

    #[test]
    fn empty_set_yields_all_false_of_frame_length() {
        let frame = Frame::new(make_bars(&[10.0, 11.0, 12.0, 13.0]));
        let mask = combine(&ConditionSet::default(), &frame, &Assignment::new()).unwrap();
        assert_eq!(mask.len(), 4);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn single_condition_passes_through() {
        let (frame, set) = frame_and_set(&[&[true, false, true]]);
        let mask = combine(&set, &frame, &Assignment::new()).unwrap();
        assert_eq!(mask.rows(), &[true, false, true]);
    }

    #[test]
    fn three_conditions_and_rowwise() {
        let (frame, set) = frame_and_set(&[
            &[true, false, true],
            &[true, true, true],
            &[true, false, false],
        ]);
        let mask = combine(&set, &frame, &Assignment::new()).unwrap();
        assert_eq!(mask.rows(), &[true, false, false]);
    }

    #[test]
    fn output_length_matches_frame() {
        let (frame, set) = frame_and_set(&[&[true, true, false, true, false]]);
        let mask = combine(&set, &frame, &Assignment::new()).unwrap();
        assert_eq!(mask.len(), frame.len());
    }

    #[test]
    fn error_in_any_condition_propagates() {
        let (frame, mut set) = frame_and_set(&[&[false, false, false]]);
        set.0.push(Condition {
            label: "broken".into(),
            rule: Predicate::Gt(Operand::col("missing"), Operand::Const(0.0)),
        });
        // The first series is already all-false, but the missing column must
        // still surface as an error.
        assert!(combine(&set, &frame, &Assignment::new()).is_err());
    }

    #[test]
    fn union_is_additive() {
        let a = SignalMask::from_rows(vec![true, false, false]);
        let b = SignalMask::from_rows(vec![false, false, true]);
        assert_eq!(a.union(&b).rows(), &[true, false, true]);
        // Symmetric and idempotent.
        assert_eq!(b.union(&a), a.union(&b));
        assert_eq!(a.union(&a), a);
    }

    #[test]
    fn mask_count() {
        let mask = SignalMask::from_rows(vec![true, false, true, true]);
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn mask_serialization_roundtrip() {
        let mask = SignalMask::from_rows(vec![true, false, true]);
        let json = serde_json::to_string(&mask).unwrap();
        let deser: SignalMask = serde_json::from_str(&json).unwrap();
        assert_eq!(mask, deser);
    }
}
