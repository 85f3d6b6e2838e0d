//! Scorecard engine: weighted component scores and the coverage ratchet.

pub mod actions;
pub mod metrics;
pub mod ratchet;
pub mod scorer;
pub mod types;

pub use actions::{derive_action_items, ActionContext};
pub use metrics::{CheckRuns, MetricsClassifier, OutputCounts, RegexClassifier};
pub use ratchet::{next_floor, next_scorecard};
pub use scorer::Scorer;
pub use types::*;
