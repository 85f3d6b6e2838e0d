//! Pattern tracker: cumulative failure signatures and rule promotion.

pub mod tracker;
pub mod types;

pub use tracker::{build_regex, PatternTracker};
pub use types::*;
