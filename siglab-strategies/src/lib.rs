//! SigLab strategy modules.
//!
//! Each module pairs a fixed rule set (baked thresholds, literal ROI
//! schedule, literal stoploss) with an optional hyperopt surface (declared
//! search spaces plus guard/trigger catalogs). The host backtests the fixed
//! path directly; an external optimizer drives the hyperopt path through
//! `Hyperoptable::entry_mask` / `exit_mask` / `roi_table`.

pub mod alligator;
pub mod bband_rsi;
pub mod ema_skip_pump;
pub mod ema_volume;
pub mod rockwell;

pub use alligator::Alligator;
pub use bband_rsi::BbandRsi;
pub use ema_skip_pump::EmaSkipPump;
pub use ema_volume::EmaVolume;
pub use rockwell::Rockwell;

use siglab_core::roi::RoiTable;
use siglab_core::strategy::{Hyperoptable, Strategy};

/// Host-default ROI schedule for modules that declare none of their own.
pub(crate) fn default_roi() -> RoiTable {
    RoiTable::from_steps([(0, 0.04), (20, 0.02), (30, 0.01), (40, 0.0)])
}

/// Host-default stoploss for modules that declare none of their own.
pub(crate) const DEFAULT_STOPLOSS: f64 = -0.10;

/// Every registered strategy module.
pub fn all_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(Rockwell),
        Box::new(EmaSkipPump),
        Box::new(EmaVolume),
        Box::new(Alligator),
        Box::new(BbandRsi),
    ]
}

/// Look up a strategy by registry name.
pub fn find_strategy(name: &str) -> Option<Box<dyn Strategy>> {
    all_strategies().into_iter().find(|s| s.name() == name)
}

/// Every module with a hyperopt surface (BbandRsi is fixed-rule only).
pub fn all_hyperoptable() -> Vec<Box<dyn Hyperoptable>> {
    vec![
        Box::new(Rockwell),
        Box::new(EmaSkipPump),
        Box::new(EmaVolume),
        Box::new(Alligator),
    ]
}

/// Look up a hyperopt surface by registry name.
pub fn find_hyperoptable(name: &str) -> Option<Box<dyn Hyperoptable>> {
    all_hyperoptable().into_iter().find(|s| s.name() == name)
}
