//! Parameter values, assignments, and search-space declarations.
//!
//! An `Assignment` distinguishes three states per parameter name: absent,
//! present-and-false, and present-and-true. Guard inclusion tests membership
//! first — an absent toggle means "feature off" regardless of any default,
//! and that convention is load-bearing for reproducing optimizer behavior.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One concrete parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Toggle(bool),
    Int(i64),
    Real(f64),
    Choice(String),
}

impl ParamValue {
    /// Numeric view: `Int` and `Real` values as f64, everything else `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Real(v) => Some(*v),
            _ => None,
        }
    }
}

/// A concrete point in a search space: name -> value.
///
/// `BTreeMap` keeps iteration (and serialization) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment(BTreeMap<String, ParamValue>);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// True iff the name is present AND holds `Toggle(true)`.
    ///
    /// Absent and present-but-false both read as "off"; so does a value of
    /// any other kind (a typed space never declares a toggle elsewhere).
    pub fn toggle_on(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(ParamValue::Toggle(true)))
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(ParamValue::Real(v)) => Some(*v),
            _ => None,
        }
    }

    /// `Int` or `Real` as f64 (thresholds accept either).
    pub fn number(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(ParamValue::as_f64)
    }

    pub fn choice(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(ParamValue::Choice(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Declared domain of one tunable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    /// Inclusive integer range.
    Int { lo: i64, hi: i64 },
    /// Inclusive continuous range.
    Real { lo: f64, hi: f64 },
    /// On/off flag.
    Toggle,
    /// Finite set of named alternatives.
    Choice(Vec<String>),
}

impl Dimension {
    /// Draw a uniform value from this domain.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ParamValue {
        match self {
            Dimension::Int { lo, hi } => ParamValue::Int(rng.gen_range(*lo..=*hi)),
            Dimension::Real { lo, hi } => ParamValue::Real(rng.gen_range(*lo..=*hi)),
            Dimension::Toggle => ParamValue::Toggle(rng.gen_bool(0.5)),
            Dimension::Choice(choices) => {
                let idx = rng.gen_range(0..choices.len());
                ParamValue::Choice(choices[idx].clone())
            }
        }
    }

    /// Does `value` belong to this domain (kind and range)?
    fn admits(&self, value: &ParamValue) -> Admits {
        match (self, value) {
            (Dimension::Int { lo, hi }, ParamValue::Int(v)) => {
                if (lo..=hi).contains(&v) {
                    Admits::Yes
                } else {
                    Admits::OutOfRange
                }
            }
            (Dimension::Real { lo, hi }, ParamValue::Real(v)) => {
                if *v >= *lo && *v <= *hi {
                    Admits::Yes
                } else {
                    Admits::OutOfRange
                }
            }
            (Dimension::Toggle, ParamValue::Toggle(_)) => Admits::Yes,
            (Dimension::Choice(choices), ParamValue::Choice(v)) => {
                if choices.contains(v) {
                    Admits::Yes
                } else {
                    Admits::OutOfRange
                }
            }
            _ => Admits::WrongKind,
        }
    }
}

enum Admits {
    Yes,
    WrongKind,
    OutOfRange,
}

/// Errors from declaring a space or checking an assignment against it.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("parameter '{0}' declared more than once in one space")]
    DuplicateName(String),
    #[error("parameter '{0}' is not declared in this space")]
    UnknownParam(String),
    #[error("parameter '{0}' has the wrong kind for its declared domain")]
    WrongKind(String),
    #[error("parameter '{0}' is outside its declared domain")]
    OutOfDomain(String),
}

/// An ordered list of named dimensions — one side's declared search space.
///
/// Construction rejects duplicate names; checking rejects out-of-domain
/// values rather than clamping, so a caller can never silently explore
/// outside the declared space. Absent names pass (feature-absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    dims: Vec<(String, Dimension)>,
}

impl SearchSpace {
    pub fn new(dims: Vec<(String, Dimension)>) -> Result<Self, SpaceError> {
        let mut seen = HashSet::new();
        for (name, _) in &dims {
            if !seen.insert(name.clone()) {
                return Err(SpaceError::DuplicateName(name.clone()));
            }
        }
        Ok(Self { dims })
    }

    /// Empty space (strategies with no tunable side).
    pub fn empty() -> Self {
        Self { dims: Vec::new() }
    }

    pub fn dims(&self) -> &[(String, Dimension)] {
        &self.dims
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dims
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Validate an assignment against this space.
    ///
    /// Every present value must name a declared dimension and fall inside
    /// it. Declared-but-absent names are fine.
    pub fn check(&self, assignment: &Assignment) -> Result<(), SpaceError> {
        for (name, value) in assignment.iter() {
            let dim = self
                .dimension(name)
                .ok_or_else(|| SpaceError::UnknownParam(name.to_string()))?;
            match dim.admits(value) {
                Admits::Yes => {}
                Admits::WrongKind => return Err(SpaceError::WrongKind(name.to_string())),
                Admits::OutOfRange => return Err(SpaceError::OutOfDomain(name.to_string())),
            }
        }
        Ok(())
    }

    /// Draw a full assignment: one uniform value per dimension.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Assignment {
        let mut assignment = Assignment::new();
        for (name, dim) in &self.dims {
            assignment.insert(name.clone(), dim.sample(rng));
        }
        assignment
    }
}
