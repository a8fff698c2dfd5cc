//! ROI schedule — a step-down table of minimum acceptable return.
//!
//! Keyed by minutes since entry; values decay to zero at the largest key.
//! Built from six parameters (`roi_t1..t3`, `roi_p1..p3`) with the exact
//! arithmetic of the original table generator:
//!
//! ```text
//! 0            -> p1 + p2 + p3
//! t3           -> p1 + p2
//! t3 + t2      -> p1
//! t3 + t2 + t1 -> 0
//! ```
//!
//! A zero `t1` or `t2` collides two keys; the later insertion wins, exactly
//! like assigning a duplicate key into an ordered mapping. The collapsed
//! table is degenerate but valid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::Assignment;

/// Errors from building a ROI table.
#[derive(Debug, thiserror::Error)]
pub enum RoiError {
    #[error("ROI parameter '{0}' missing from assignment")]
    MissingParam(&'static str),
}

/// Ordered mapping: minutes since entry -> minimum return fraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiTable {
    steps: BTreeMap<u32, f64>,
}

impl RoiTable {
    /// Build from literal (minutes, return) steps — the fixed-strategy path.
    pub fn from_steps<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Minimum return required at `minutes` since entry: the value of the
    /// largest key not exceeding `minutes`. `None` before the first step.
    pub fn required_at(&self, minutes: u32) -> Option<f64> {
        self.steps
            .range(..=minutes)
            .next_back()
            .map(|(_, &v)| v)
    }

    pub fn steps(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.steps.iter().map(|(&k, &v)| (k, v))
    }
}

/// Build the step-down table from a sampled assignment.
///
/// The arithmetic mirrors the original generator exactly, including the
/// last-write-wins collapse when offsets are zero. Values are weakly
/// decreasing by construction for non-negative p's; the builder trusts the
/// declared ranges and does not enforce that itself.
pub fn build_roi_table(assignment: &Assignment) -> Result<RoiTable, RoiError> {
    let t1 = roi_offset(assignment, "roi_t1")?;
    let t2 = roi_offset(assignment, "roi_t2")?;
    let t3 = roi_offset(assignment, "roi_t3")?;
    let p1 = roi_fraction(assignment, "roi_p1")?;
    let p2 = roi_fraction(assignment, "roi_p2")?;
    let p3 = roi_fraction(assignment, "roi_p3")?;

    let mut steps = BTreeMap::new();
    steps.insert(0, p1 + p2 + p3);
    steps.insert(t3, p1 + p2);
    steps.insert(t3 + t2, p1);
    steps.insert(t3 + t2 + t1, 0.0);

    Ok(RoiTable { steps })
}

fn roi_offset(assignment: &Assignment, name: &'static str) -> Result<u32, RoiError> {
    let v = assignment.int(name).ok_or(RoiError::MissingParam(name))?;
    Ok(u32::try_from(v).unwrap_or(0))
}

fn roi_fraction(assignment: &Assignment, name: &'static str) -> Result<f64, RoiError> {
    assignment.real(name).ok_or(RoiError::MissingParam(name))
}
