//! Policy pack resolution and effective verify config.

mod common;

use common::{config, write};
use ratchet_core::errors::{ConfigError, PackError, RunError};
use ratchet_engine::policy::{
    builtin_pack_names, load_pack, resolve_pack, resolve_verify_config, GateKind, PackSource,
    TaskIdSource,
};

#[test]
fn test_builtin_packs_resolve_by_prefix() {
    let dir = tempfile::TempDir::new().unwrap();
    let pack = resolve_pack(dir.path(), "builtin:baseline").unwrap();
    assert!(matches!(pack.source, PackSource::Builtin { ref name, .. } if name == "baseline"));
    assert_eq!(pack.path(), "builtin:baseline");
}

#[test]
fn test_every_builtin_pack_loads() {
    let dir = tempfile::TempDir::new().unwrap();
    let names: Vec<&str> = builtin_pack_names().collect();
    assert_eq!(names, vec!["baseline", "evidence"]);
    for name in names {
        let pack = load_pack(dir.path(), &format!("builtin:{name}")).unwrap();
        assert!(pack.verify["gates"].as_array().is_some_and(|g| !g.is_empty()));
    }
}

#[test]
fn test_unknown_builtin_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = resolve_pack(dir.path(), "builtin:paranoid").unwrap_err();
    assert!(matches!(err, PackError::UnknownBuiltin { ref name } if name == "paranoid"));
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = resolve_pack(dir.path(), "packs/strict.toml").unwrap_err();
    assert!(matches!(err, PackError::NotFound { .. }));
}

#[test]
fn test_bare_builtin_name_resolves_when_no_file_exists() {
    let dir = tempfile::TempDir::new().unwrap();
    let pack = resolve_pack(dir.path(), "evidence").unwrap();
    assert!(matches!(pack.source, PackSource::Builtin { .. }));

    write(dir.path(), "evidence", "[verify]\nenabled = true\n");
    let pack = resolve_pack(dir.path(), "evidence").unwrap();
    assert!(matches!(pack.source, PackSource::File(_)));
}

#[test]
fn test_toml_pack_unwraps_verify_and_drops_commands() {
    let dir = tempfile::TempDir::new().unwrap();
    write(
        dir.path(),
        "packs/team.toml",
        r#"
[verify]
require_task_id = true

[verify.commands]
build = "make deploy"

[[verify.gates]]
id = "lint"
type = "command"
command = "${commands.lint}"
"#,
    );
    let pack = load_pack(dir.path(), "packs/team.toml").unwrap();
    assert_eq!(pack.verify["require_task_id"], true);
    assert!(pack.verify.get("commands").is_none());
    assert_eq!(pack.verify["gates"][0]["id"], "lint");
    assert!(pack.path.ends_with("team.toml"));
}

#[test]
fn test_json_pack_without_wrapper_is_whole_document() {
    let dir = tempfile::TempDir::new().unwrap();
    write(
        dir.path(),
        "packs/team.json",
        r#"{"enabled": true, "gates": [{"id": "readme", "type": "file_exists", "paths": ["README.md"]}]}"#,
    );
    let pack = load_pack(dir.path(), "packs/team.json").unwrap();
    assert_eq!(pack.verify["enabled"], true);
    assert_eq!(pack.verify["gates"][0]["id"], "readme");
}

#[test]
fn test_non_object_pack_is_invalid() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path(), "packs/list.json", "[1, 2, 3]");
    let err = load_pack(dir.path(), "packs/list.json").unwrap_err();
    assert!(matches!(err, PackError::Invalid { .. }));

    write(dir.path(), "packs/broken.toml", "verify = [");
    let err = load_pack(dir.path(), "packs/broken.toml").unwrap_err();
    assert!(matches!(err, PackError::Invalid { .. }));
}

#[test]
fn test_defaults_without_packs_or_local_block() {
    let dir = tempfile::TempDir::new().unwrap();
    let effective = resolve_verify_config(dir.path(), &config("", "")).unwrap();
    let cfg = &effective.config;
    assert!(!cfg.enabled);
    assert!(!cfg.require_task_id);
    assert_eq!(cfg.task_id_env, "TASK_ID");
    assert_eq!(cfg.task_id_sources, TaskIdSource::defaults());
    assert!(cfg.gates.is_empty());
    assert!(effective.packs.is_empty());
    assert_eq!(effective.commands["build"], "npm run build");
    assert_eq!(effective.commands.len(), 4);
}

#[test]
fn test_packs_then_local_block_merge_in_order() {
    let dir = tempfile::TempDir::new().unwrap();
    write(
        dir.path(),
        "packs/team.toml",
        r#"
[verify]
task_id_env = "TEAM_TICKET"

[[verify.gates]]
id = "build"
type = "command"
command = "make release"

[[verify.gates]]
id = "changelog"
type = "regex"
file = "CHANGELOG.md"
pattern = "Unreleased"
"#,
    );
    let cfg = config(
        r#"policy_packs = ["builtin:baseline", "packs/team.toml"]"#,
        r#"
[verify]
task_id_sources = ["branch"]

[[verify.gates]]
id = "changelog"
required = false

[[verify.gates]]
id = "docs"
type = "file_exists"
paths = ["docs/index.md"]
"#,
    );

    let effective = resolve_verify_config(dir.path(), &cfg).unwrap();
    let ids: Vec<&str> = effective.config.gates.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["build", "tests", "changelog", "docs"]);

    let build = &effective.config.gates[0];
    assert_eq!(
        build.kind,
        GateKind::Command {
            command: "make release".to_string()
        }
    );
    assert_eq!(build.description.as_deref(), Some("Project builds cleanly"));

    let changelog = &effective.config.gates[2];
    assert!(!changelog.required);
    assert!(matches!(changelog.kind, GateKind::Regex { min_matches: 1, .. }));

    assert!(effective.config.enabled);
    assert_eq!(effective.config.task_id_env, "TEAM_TICKET");
    assert_eq!(effective.config.task_id_sources, vec![TaskIdSource::Branch]);
    assert_eq!(effective.packs.len(), 2);
    assert_eq!(effective.packs[0].reference, "builtin:baseline");
    assert_eq!(effective.packs[1].reference, "packs/team.toml");
}

#[test]
fn test_empty_task_id_sources_fall_back_to_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = config("", "[verify]\ntask_id_sources = []\n");
    let effective = resolve_verify_config(dir.path(), &cfg).unwrap();
    assert_eq!(effective.config.task_id_sources, TaskIdSource::defaults());
}

#[test]
fn test_gate_without_id_is_a_config_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = config("", "[[verify.gates]]\ntype = \"command\"\ncommand = \"make\"\n");
    let err = resolve_verify_config(dir.path(), &cfg).unwrap_err();
    assert!(matches!(err, RunError::Config(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_local_block_cannot_override_commands() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = config("", "[verify.commands]\nbuild = \"true\"\n");
    let effective = resolve_verify_config(dir.path(), &cfg).unwrap();
    assert_eq!(effective.commands["build"], "npm run build");
    assert!(effective.document.get("commands").is_none());
}
