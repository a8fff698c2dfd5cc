//! Condition catalog and compiler.
//!
//! A catalog is one side's vocabulary: guard conditions (independently
//! toggled by a boolean parameter) and trigger conditions (a mutually
//! exclusive family selected by one categorical parameter). Compiling a
//! catalog against a concrete assignment yields an ordered `ConditionSet`;
//! the mask combinator turns that into a per-row signal.
//!
//! Predicates are pure: (frame, assignment) -> boolean series. A predicate
//! that references an indicator column the frame does not carry fails with
//! `SignalError::MissingIndicator` — it is never silently false.

use serde::{Deserialize, Serialize};

use crate::domain::{Frame, SeriesSource};
use crate::indicators::rolling::{rolling_stat, RollingStat};
use crate::params::Assignment;
use crate::series::{crossed_above, crossed_below, shift_forward};

/// Tolerance for the equality predicate.
const EQ_EPSILON: f64 = 1e-9;

/// Errors raised while evaluating conditions against a frame.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("indicator column '{0}' missing from frame")]
    MissingIndicator(String),
    #[error("parameter '{0}' required by an active condition is missing")]
    MissingParam(String),
    #[error("parameter '{0}' is not numeric")]
    NonNumericParam(String),
}

/// How a dynamic rolling operand finds its window size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Window {
    Fixed(usize),
    /// Window size read from an integer parameter at evaluation time.
    Param(String),
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// Close price series.
    Close,
    /// Volume series.
    Volume,
    /// A named indicator column on the frame.
    Column(String),
    /// A scalar threshold resolved from the assignment, broadcast per row.
    Param(String),
    /// A literal scalar, broadcast per row.
    Const(f64),
    /// A rolling statistic computed at evaluation time. `shift` reads the
    /// window ending that many rows earlier (1 = previous bar's value).
    Rolling {
        source: SeriesSource,
        stat: RollingStat,
        window: Window,
        shift: usize,
    },
    /// An operand scaled by a constant factor.
    Scaled { inner: Box<Operand>, factor: f64 },
}

impl Operand {
    pub fn col(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        Operand::Param(name.into())
    }

    pub fn scaled(inner: Operand, factor: f64) -> Self {
        Operand::Scaled {
            inner: Box::new(inner),
            factor,
        }
    }

    fn resolve<'f>(
        &self,
        frame: &'f Frame,
        assignment: &Assignment,
    ) -> Result<Resolved<'f>, SignalError> {
        match self {
            Operand::Close => Ok(Resolved::Borrowed(frame.closes())),
            Operand::Volume => Ok(Resolved::Borrowed(frame.volumes())),
            Operand::Column(name) => frame
                .column(name)
                .map(Resolved::Borrowed)
                .ok_or_else(|| SignalError::MissingIndicator(name.clone())),
            Operand::Param(name) => {
                let value = assignment
                    .get(name)
                    .ok_or_else(|| SignalError::MissingParam(name.clone()))?;
                let scalar = value
                    .as_f64()
                    .ok_or_else(|| SignalError::NonNumericParam(name.clone()))?;
                Ok(Resolved::Scalar(scalar))
            }
            Operand::Const(v) => Ok(Resolved::Scalar(*v)),
            Operand::Rolling {
                source,
                stat,
                window,
                shift,
            } => {
                let w = match window {
                    Window::Fixed(w) => *w,
                    Window::Param(name) => {
                        let v = assignment
                            .int(name)
                            .ok_or_else(|| SignalError::MissingParam(name.clone()))?;
                        usize::try_from(v).unwrap_or(0)
                    }
                };
                let mut series = rolling_stat(frame.source(*source), w, *stat);
                if *shift > 0 {
                    series = shift_forward(&series, *shift);
                }
                Ok(Resolved::Series(series.into()))
            }
            Operand::Scaled { inner, factor } => {
                Ok(match inner.resolve(frame, assignment)? {
                    Resolved::Scalar(v) => Resolved::Scalar(v * factor),
                    Resolved::Borrowed(s) => {
                        Resolved::Series(s.iter().map(|v| v * factor).collect())
                    }
                    Resolved::Series(s) => {
                        Resolved::Series(s.iter().map(|v| v * factor).collect())
                    }
                })
            }
        }
    }
}

/// Operand resolved against a frame: a series or a broadcast scalar.
enum Resolved<'f> {
    Borrowed(&'f [f64]),
    Series(Box<[f64]>),
    Scalar(f64),
}

impl Resolved<'_> {
    fn at(&self, i: usize) -> f64 {
        match self {
            Resolved::Borrowed(s) => s[i],
            Resolved::Series(s) => s[i],
            Resolved::Scalar(v) => *v,
        }
    }

    fn values(&self, n: usize) -> Vec<f64> {
        match self {
            Resolved::Borrowed(s) => s.to_vec(),
            Resolved::Series(s) => s.to_vec(),
            Resolved::Scalar(v) => vec![*v; n],
        }
    }
}

/// A boolean-producing comparison rule over two operands.
///
/// NaN on either side makes the row false (ordinary float comparison
/// semantics); crossing rules use the exact two-row semantics from
/// `crate::series` and are false at row 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Gt(Operand, Operand),
    Ge(Operand, Operand),
    Lt(Operand, Operand),
    Le(Operand, Operand),
    /// Equality within 1e-9.
    Eq(Operand, Operand),
    CrossedAbove(Operand, Operand),
    CrossedBelow(Operand, Operand),
}

impl Predicate {
    /// Evaluate this predicate over every row of the frame.
    pub fn evaluate(
        &self,
        frame: &Frame,
        assignment: &Assignment,
    ) -> Result<Vec<bool>, SignalError> {
        let n = frame.len();
        let (left, right) = match self {
            Predicate::Gt(l, r)
            | Predicate::Ge(l, r)
            | Predicate::Lt(l, r)
            | Predicate::Le(l, r)
            | Predicate::Eq(l, r)
            | Predicate::CrossedAbove(l, r)
            | Predicate::CrossedBelow(l, r) => (l, r),
        };
        let left = left.resolve(frame, assignment)?;
        let right = right.resolve(frame, assignment)?;

        let out = match self {
            Predicate::Gt(..) => (0..n).map(|i| left.at(i) > right.at(i)).collect(),
            Predicate::Ge(..) => (0..n).map(|i| left.at(i) >= right.at(i)).collect(),
            Predicate::Lt(..) => (0..n).map(|i| left.at(i) < right.at(i)).collect(),
            Predicate::Le(..) => (0..n).map(|i| left.at(i) <= right.at(i)).collect(),
            Predicate::Eq(..) => (0..n)
                .map(|i| (left.at(i) - right.at(i)).abs() < EQ_EPSILON)
                .collect(),
            Predicate::CrossedAbove(..) => crossed_above(&left.values(n), &right.values(n)),
            Predicate::CrossedBelow(..) => crossed_below(&left.values(n), &right.values(n)),
        };
        Ok(out)
    }
}

/// A guard condition: included iff its enable parameter is present and true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    /// Name of the boolean enable parameter.
    pub enable: String,
    pub rule: Predicate,
}

/// A trigger condition: included iff the catalog's selector parameter
/// holds exactly this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Categorical value that selects this trigger.
    pub value: String,
    pub rule: Predicate,
}

/// One side's condition vocabulary: guards, then a trigger family keyed by
/// a single categorical selector parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub guards: Vec<Guard>,
    /// Name of the categorical parameter selecting among `triggers`.
    pub selector: String,
    pub triggers: Vec<Trigger>,
}

impl Catalog {
    pub fn new(guards: Vec<Guard>, selector: impl Into<String>, triggers: Vec<Trigger>) -> Self {
        Self {
            guards,
            selector: selector.into(),
            triggers,
        }
    }
}

/// One compiled condition, labeled for reproducible debugging output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub label: String,
    pub rule: Predicate,
}

/// The ordered result of compiling a catalog against an assignment:
/// active guards in declaration order, then the selected trigger, if any.
///
/// Order never changes the AND result, but it is stable so two compilations
/// of the same assignment are byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet(pub Vec<Condition>);

impl ConditionSet {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self(conditions)
    }

    /// Build a fixed set from labeled predicates (the non-hyperopt path).
    pub fn fixed(rules: Vec<(&str, Predicate)>) -> Self {
        Self(
            rules
                .into_iter()
                .map(|(label, rule)| Condition {
                    label: label.to_string(),
                    rule,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Select the active subset of a catalog for one assignment.
///
/// - A guard is active iff its enable name is present in the assignment and
///   true. Wholly absent names exclude the guard no matter what — the
///   membership test comes first and is not a default lookup.
/// - The trigger whose value equals the selector's choice is appended last;
///   a missing selector or an unmatched choice selects nothing (not an
///   error).
/// - An empty result is a valid outcome, handled by the mask combinator.
pub fn compile(catalog: &Catalog, assignment: &Assignment) -> ConditionSet {
    let mut conditions = Vec::new();

    for guard in &catalog.guards {
        if assignment.toggle_on(&guard.enable) {
            conditions.push(Condition {
                label: guard.enable.clone(),
                rule: guard.rule.clone(),
            });
        }
    }

    if let Some(choice) = assignment.choice(&catalog.selector) {
        if let Some(trigger) = catalog.triggers.iter().find(|t| t.value == choice) {
            conditions.push(Condition {
                label: trigger.value.clone(),
                rule: trigger.rule.clone(),
            });
        }
    }

    ConditionSet(conditions)
}
