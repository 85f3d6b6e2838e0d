//! Ratchet engine: scoring, pattern tracking, policy merge, and gate evaluation.
//!
//! Subsystems:
//! - `scorecard`: weighted 0 to 100 score with a monotonic coverage floor
//! - `patterns`: cumulative failure-pattern counts and rule promotion
//! - `policy`: policy-pack resolution and verify-config merge
//! - `verify`: gate evaluation, structural schema validation, waivers
//! - `store`: persisted scorecard, pattern, and artifact files
//! - `pipeline`: the `run` and `verify` orchestration on top of the above

pub mod patterns;
pub mod pipeline;
pub mod policy;
pub mod scorecard;
pub mod store;
pub mod verify;

pub use pipeline::{Engine, RunOptions, RunOutcome, RunReport};
