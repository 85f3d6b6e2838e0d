//! Shared constants for the Ratchet engine.

/// Project config file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "ratchet.toml";

/// Default quality directory, relative to the project root.
pub const DEFAULT_QUALITY_DIR: &str = ".quality";

/// Default per-package coverage summary path (Istanbul `json-summary`).
pub const DEFAULT_COVERAGE_SUMMARY: &str = "coverage/coverage-summary.json";

/// Scorecard file name inside the quality dir.
pub const SCORECARD_FILE: &str = "scorecard.json";

/// Pattern state file name inside the quality dir.
pub const PATTERNS_FILE: &str = "patterns.json";

/// Verification artifact file name inside the quality dir.
pub const VERIFICATION_FILE: &str = "verification.json";

/// Default waivers file name inside the quality dir.
pub const DEFAULT_WAIVERS_FILE: &str = "waivers.json";

/// Pause flag file name inside the quality dir.
pub const PAUSE_FILE: &str = "PAUSED";

/// Maximum number of history entries kept on the scorecard.
pub const HISTORY_LIMIT: usize = 50;

/// Safety margin subtracted from measured coverage before ratcheting the floor.
pub const COVERAGE_FLOOR_MARGIN: f64 = 2.0;

/// Default sighting count at which a pattern is recommended as an agent rule.
pub const DEFAULT_CLAUDE_RULE_THRESHOLD: u64 = 3;

/// Default sighting count at which a pattern is recommended as a lint rule.
pub const DEFAULT_LINT_RULE_THRESHOLD: u64 = 5;

/// Default task identifier pattern: one uppercase letter, alphanumerics, hyphen, digits.
pub const DEFAULT_TASK_ID_PATTERN: &str = r"[A-Z][A-Z0-9]+-\d+";

/// Default environment variable scanned for task ids.
pub const DEFAULT_TASK_ID_ENV: &str = "TASK_ID";

/// Maximum captured characters of gate stdout/stderr.
pub const MAX_CAPTURED_OUTPUT: usize = 20_000;

/// Prefix that marks a builtin policy pack reference.
pub const BUILTIN_PACK_PREFIX: &str = "builtin:";
