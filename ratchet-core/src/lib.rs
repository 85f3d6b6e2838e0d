//! Core types, traits, errors, config, events, and tracing for Ratchet.
//!
//! Everything in this crate is shared by the scoring and verification
//! pipelines in `ratchet-engine`: the layered project configuration, the
//! per-subsystem error enums, the synchronous event system, and the narrow
//! collaborator traits (command runner, coverage reader, branch source).

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
