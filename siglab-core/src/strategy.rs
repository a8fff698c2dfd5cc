//! Strategy trait surface — the contract between plugin modules and a host.
//!
//! `Strategy` is the fixed path: baked-in rules, ROI literals, stoploss.
//! `Hyperoptable` adds the declared search spaces and condition catalogs;
//! its provided methods (`entry_mask`, `exit_mask`, `roi_table`) are the
//! entire contract an external optimizer needs — it samples assignments
//! from the declared spaces and maps each to masks and a ROI schedule.

use crate::conditions::{compile, Catalog, SignalError};
use crate::domain::{Bar, Frame};
use crate::mask::{combine, SignalMask};
use crate::params::{Assignment, SearchSpace, SpaceError};
use crate::roi::{build_roi_table, RoiError, RoiTable};

/// Any failure while turning an assignment into a mask or a ROI table.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Space(#[from] SpaceError),
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Roi(#[from] RoiError),
}

/// A strategy plugin: indicator population plus fixed entry/exit rules.
///
/// All methods are pure with respect to the bar series; a strategy holds no
/// per-evaluation state, so one instance can serve many concurrent
/// evaluations.
pub trait Strategy: Send + Sync {
    /// Registry name (e.g., "rockwell").
    fn name(&self) -> &str;

    /// Bar timeframe the rules were designed for (e.g., "5m", "1d").
    fn timeframe(&self) -> &str;

    /// Baked-in ROI schedule for the fixed path.
    fn minimal_roi(&self) -> RoiTable;

    /// Baked-in stoploss fraction (negative).
    fn stoploss(&self) -> f64;

    /// Build the frame: bars plus every indicator column the rules read.
    fn populate_indicators(&self, bars: Vec<Bar>) -> Frame;

    /// Fixed entry rule over a populated frame.
    fn entry_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError>;

    /// Fixed exit rule over a populated frame.
    fn exit_signal(&self, frame: &Frame) -> Result<SignalMask, SignalError>;
}

/// A strategy with a declared search space for an external optimizer.
pub trait Hyperoptable: Strategy {
    /// Entry-side space: guard toggles, thresholds, and the trigger selector.
    fn entry_space(&self) -> SearchSpace;

    /// Exit-side space.
    fn exit_space(&self) -> SearchSpace;

    /// The six ROI step parameters.
    fn roi_space(&self) -> SearchSpace;

    /// One negative continuous stoploss fraction.
    fn stoploss_space(&self) -> SearchSpace;

    /// Entry-side condition vocabulary.
    fn entry_catalog(&self) -> Catalog;

    /// Exit-side condition vocabulary.
    fn exit_catalog(&self) -> Catalog;

    /// Entry mask for one sampled assignment.
    ///
    /// The assignment is validated against the entry space first (rejected,
    /// never clamped), then compiled and combined. An assignment with no
    /// active conditions yields an all-false mask.
    fn entry_mask(&self, frame: &Frame, assignment: &Assignment) -> Result<SignalMask, EvalError> {
        self.entry_space().check(assignment)?;
        let set = compile(&self.entry_catalog(), assignment);
        Ok(combine(&set, frame, assignment)?)
    }

    /// Exit mask for one sampled assignment.
    fn exit_mask(&self, frame: &Frame, assignment: &Assignment) -> Result<SignalMask, EvalError> {
        self.exit_space().check(assignment)?;
        let set = compile(&self.exit_catalog(), assignment);
        Ok(combine(&set, frame, assignment)?)
    }

    /// ROI table for one sampled assignment.
    fn roi_table(&self, assignment: &Assignment) -> Result<RoiTable, EvalError> {
        Ok(build_roi_table(assignment)?)
    }
}

/// The conventional ROI space bounds shared by most plugin modules.
pub fn default_roi_space() -> SearchSpace {
    use crate::params::Dimension;
    SearchSpace::new(vec![
        ("roi_t1".into(), Dimension::Int { lo: 0, hi: 120 }),
        ("roi_t2".into(), Dimension::Int { lo: 0, hi: 100 }),
        ("roi_t3".into(), Dimension::Int { lo: 10, hi: 100 }),
        ("roi_p1".into(), Dimension::Real { lo: 0.01, hi: 0.04 }),
        ("roi_p2".into(), Dimension::Real { lo: 0.01, hi: 0.08 }),
        ("roi_p3".into(), Dimension::Real { lo: 0.01, hi: 0.20 }),
    ])
    .expect("static ROI space is duplicate-free")
}

/// A single-dimension stoploss space over the given (negative) range.
pub fn stoploss_space_between(lo: f64, hi: f64) -> SearchSpace {
    use crate::params::Dimension;
    debug_assert!(lo < hi && hi < 0.0, "stoploss range must be negative");
    SearchSpace::new(vec![("stoploss".into(), Dimension::Real { lo, hi })])
        .expect("single-dimension space is duplicate-free")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn default_roi_space_has_six_dims() {
        let space = default_roi_space();
        assert_eq!(space.len(), 6);
        assert!(space.dimension("roi_t1").is_some());
        assert!(space.dimension("roi_p3").is_some());
    }

    #[test]
    fn stoploss_space_accepts_range_values() {
        let space = stoploss_space_between(-0.3, -0.001);
        let a = Assignment::new().with("stoploss", ParamValue::Real(-0.05));
        assert!(space.check(&a).is_ok());
        let b = Assignment::new().with("stoploss", ParamValue::Real(0.05));
        assert!(space.check(&b).is_err());
    }
}
