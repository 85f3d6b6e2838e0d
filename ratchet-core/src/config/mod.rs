//! Configuration system for Ratchet.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod command_config;
pub mod pattern_config;
pub mod ratchet_config;
pub mod weight_config;

pub use command_config::CommandConfig;
pub use pattern_config::{PatternConfig, PatternRule};
pub use ratchet_config::{CliOverrides, RatchetConfig};
pub use weight_config::{ScoreWeights, WeightConfig};
