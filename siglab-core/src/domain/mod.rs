//! Domain types: bars and the aligned bar/indicator frame.

pub mod bar;
pub mod frame;

pub use bar::Bar;
pub use frame::{Frame, SeriesSource};
