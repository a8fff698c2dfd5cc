//! SigLab Core — parameterized condition composition for bar-series signals.
//!
//! The engine behind every strategy plugin:
//! - Domain types (bars, aligned bar/indicator frames, signal masks)
//! - Indicator implementations with NaN warmup semantics
//! - Parameter spaces: declared dimensions, typed assignments, validation
//! - Condition catalogs (guards + triggers) and the compiler that selects
//!   the active subset for one assignment
//! - The mask combinator (row-wise AND, all-false on an empty set)
//! - The step-down ROI schedule builder
//! - The `Strategy`/`Hyperoptable` traits plugin modules implement

pub mod conditions;
pub mod domain;
pub mod indicators;
pub mod mask;
pub mod params;
pub mod roi;
pub mod series;
pub mod strategy;
