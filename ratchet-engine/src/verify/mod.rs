//! Task-aware verification: gate evaluation, waivers, and the verification artifact.

pub mod evaluator;
pub mod interpolate;
pub mod schema;
pub mod task_ids;
pub mod types;
pub mod waivers;

pub use evaluator::GateEvaluator;
pub use interpolate::{interpolate, InterpolationContext};
pub use schema::SchemaValidator;
pub use task_ids::{discover_task_ids, TaskIdInputs, TaskIdMatcher};
pub use types::*;
pub use waivers::{load_waivers, resolve_waiver, Waiver};
