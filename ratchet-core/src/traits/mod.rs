//! Collaborator traits the engine consumes.
//!
//! Each has a production implementation here; tests swap in scripted fakes.

pub mod branch_source;
pub mod command_runner;
pub mod coverage_reader;

pub use branch_source::{BranchSource, GitBranchSource};
pub use command_runner::{CommandOutput, CommandRunner, ShellRunner};
pub use coverage_reader::{CoverageReader, CoverageSummary, FsCoverageReader};
