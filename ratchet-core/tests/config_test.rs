//! Tests for the Ratchet configuration system.

use std::sync::Mutex;

use ratchet_core::config::{CliOverrides, CommandConfig, RatchetConfig};
use ratchet_core::errors::ConfigError;

/// Serializes tests that touch environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_ratchet_env_vars() {
    for key in [
        "RATCHET_QUALITY_DIR",
        "RATCHET_VERIFY_ENABLED",
        "RATCHET_TASK_ID_ENV",
    ] {
        std::env::remove_var(key);
    }
}

const VALID: &str = r#"
package_dirs = ["packages/api", "packages/web"]

[commands]
typecheck = "tsc --noEmit"
lint = "eslint ."
test = "jest --coverage"
build = "npm run build"
"#;

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_ratchet_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("ratchet.toml"),
        format!("quality_dir = \"from-file\"\n{VALID}"),
    )
    .unwrap();

    std::env::set_var("RATCHET_QUALITY_DIR", "from-env");
    let config = RatchetConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.effective_quality_dir(), "from-env");

    let cli = CliOverrides {
        quality_dir: Some("from-cli".to_string()),
        ..Default::default()
    };
    let config = RatchetConfig::load(dir.path(), Some(&cli)).unwrap();
    assert_eq!(config.effective_quality_dir(), "from-cli");

    clear_ratchet_env_vars();
}

#[test]
fn test_defaults_apply_when_unset() {
    let config = RatchetConfig::from_toml(VALID).unwrap();
    RatchetConfig::validate(&config).unwrap();
    assert_eq!(config.effective_quality_dir(), ".quality");
    assert_eq!(
        config.effective_coverage_summary(),
        "coverage/coverage-summary.json"
    );
    assert_eq!(config.effective_expected_packages(), 2);
    assert_eq!(config.patterns.effective_claude_threshold(), 3);
    assert_eq!(config.patterns.effective_lint_threshold(), 5);

    let weights = config.weights.resolve();
    assert_eq!(weights.type_safety, 0.25);
    assert_eq!(weights.coverage_level, 0.20);
}

#[test]
fn test_partial_weights_fall_back_per_field() {
    let config = RatchetConfig::from_toml(&format!("{VALID}\n[weights]\ntest_health = 0.5\n")).unwrap();
    let weights = config.weights.resolve();
    assert_eq!(weights.test_health, 0.5);
    assert_eq!(weights.lint_compliance, 0.15);
}

#[test]
fn test_missing_command_is_rejected() {
    let config = RatchetConfig::from_toml(
        r#"
package_dirs = ["."]

[commands]
typecheck = "tsc"
lint = "eslint ."
test = "jest"
"#,
    )
    .unwrap();
    let err = RatchetConfig::validate(&config).unwrap_err();
    assert!(matches!(err, ConfigError::MissingCommand { ref name } if name == "build"));
}

#[test]
fn test_blank_command_counts_as_missing() {
    let commands = CommandConfig {
        typecheck: Some("tsc".to_string()),
        lint: Some("   ".to_string()),
        test: Some("jest".to_string()),
        build: Some("make".to_string()),
    };
    assert!(commands.get("lint").is_none());
    assert!(commands.require("lint").is_err());
    assert_eq!(commands.named().len(), 3);
}

#[test]
fn test_empty_package_dirs_rejected() {
    let config = RatchetConfig::from_toml(
        r#"
package_dirs = []

[commands]
typecheck = "tsc"
lint = "eslint ."
test = "jest"
build = "make"
"#,
    )
    .unwrap();
    let err = RatchetConfig::validate(&config).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "package_dirs"));
}

#[test]
fn test_negative_weight_rejected() {
    let config =
        RatchetConfig::from_toml(&format!("{VALID}\n[weights]\nbuild_stability = -1.0\n")).unwrap();
    assert!(matches!(
        RatchetConfig::validate(&config),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_zero_expected_packages_rejected() {
    let config =
        RatchetConfig::from_toml(&format!("expected_coverage_packages = 0\n{VALID}")).unwrap();
    assert!(RatchetConfig::validate(&config).is_err());
}

#[test]
fn test_verify_env_overrides_land_in_verify_block() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_ratchet_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("ratchet.toml"), VALID).unwrap();
    std::env::set_var("RATCHET_VERIFY_ENABLED", "true");
    std::env::set_var("RATCHET_TASK_ID_ENV", "TICKET");

    let config = RatchetConfig::load(dir.path(), None).unwrap();
    let verify = config.verify.as_ref().unwrap();
    assert_eq!(verify["enabled"], true);
    assert_eq!(verify["task_id_env"], "TICKET");

    let cli = CliOverrides {
        verify_enabled: Some(false),
        ..Default::default()
    };
    let config = RatchetConfig::load(dir.path(), Some(&cli)).unwrap();
    assert_eq!(config.verify.as_ref().unwrap()["enabled"], false);

    clear_ratchet_env_vars();
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_ratchet_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("ratchet.toml"), "package_dirs = [").unwrap();
    let err = RatchetConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_missing_config_file_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_ratchet_env_vars();

    let dir = tempdir();
    let err = RatchetConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingCommand { .. }));
}

#[test]
fn test_verify_block_round_trips_through_toml() {
    let config = RatchetConfig::from_toml(&format!(
        "{VALID}\n[verify]\nenabled = true\n\n[[verify.gates]]\nid = \"build\"\ntype = \"command\"\ncommand = \"${{commands.build}}\"\n"
    ))
    .unwrap();
    let verify = config.verify.as_ref().unwrap();
    assert_eq!(verify["gates"][0]["command"], "${commands.build}");

    let text = config.to_toml().unwrap();
    let reparsed = RatchetConfig::from_toml(&text).unwrap();
    assert_eq!(reparsed.verify, config.verify);
}
