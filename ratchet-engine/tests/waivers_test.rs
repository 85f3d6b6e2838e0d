//! Waiver loading and resolution.

use chrono::{TimeZone, Utc};

use ratchet_core::errors::ConfigError;
use ratchet_engine::verify::{load_waivers, resolve_waiver, Waiver};

fn waiver(gate_id: &str, task_id: Option<&str>, expires_at: Option<&str>) -> Waiver {
    Waiver {
        gate_id: gate_id.to_string(),
        task_id: task_id.map(str::to_string),
        expires_at: expires_at.map(str::to_string),
        reason: None,
        approved_by: None,
    }
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_expired_waiver_never_matches() {
    let waivers = vec![waiver("build-stability", None, Some("2026-01-01T00:00:00Z"))];
    assert!(resolve_waiver(&waivers, "build-stability", &[], now()).is_none());

    let waivers = vec![waiver("build-stability", None, None)];
    assert!(resolve_waiver(&waivers, "build-stability", &[], now()).is_some());
}

#[test]
fn test_date_only_expiry_is_midnight_utc() {
    let w = waiver("g", None, Some("2026-06-02"));
    assert!(!w.is_expired(now()));
    assert!(w.is_expired(Utc.with_ymd_and_hms(2026, 6, 2, 0, 0, 0).unwrap()));
}

#[test]
fn test_unparseable_expiry_never_matches() {
    let waivers = vec![waiver("g", None, Some("next tuesday"))];
    assert!(resolve_waiver(&waivers, "g", &[], now()).is_none());
}

#[test]
fn test_wildcards_match_any_gate_and_task() {
    let waivers = vec![waiver("*", Some("*"), None)];
    assert!(resolve_waiver(&waivers, "anything", &ids(&["ABC-1"]), now()).is_some());
}

#[test]
fn test_task_scoped_waiver() {
    let waivers = vec![waiver("evidence", Some("ABC-1"), None)];
    assert!(resolve_waiver(&waivers, "evidence", &ids(&["ABC-1", "ABC-2"]), now()).is_some());
    assert!(resolve_waiver(&waivers, "evidence", &ids(&["ABC-2"]), now()).is_none());
    // No task ids resolved: the restriction cannot be checked and is ignored.
    assert!(resolve_waiver(&waivers, "evidence", &[], now()).is_some());
    assert!(resolve_waiver(&waivers, "other", &ids(&["ABC-1"]), now()).is_none());
}

#[test]
fn test_first_match_wins_in_file_order() {
    let mut general = waiver("*", None, None);
    general.reason = Some("general".to_string());
    let mut specific = waiver("build", None, None);
    specific.reason = Some("specific".to_string());

    let waivers = vec![general, specific];
    let found = resolve_waiver(&waivers, "build", &[], now()).unwrap();
    assert_eq!(found.reason.as_deref(), Some("general"));
}

#[test]
fn test_expired_entries_are_skipped_for_later_ones() {
    let waivers = vec![
        waiver("build", None, Some("2020-01-01")),
        waiver("build", None, Some("2030-01-01")),
    ];
    let found = resolve_waiver(&waivers, "build", &[], now()).unwrap();
    assert_eq!(found.expires_at.as_deref(), Some("2030-01-01"));
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let waivers = load_waivers(&dir.path().join("waivers.json")).unwrap();
    assert!(waivers.is_empty());
}

#[test]
fn test_load_accepts_list_and_wrapped_forms() {
    let dir = tempfile::TempDir::new().unwrap();
    let list = dir.path().join("list.json");
    std::fs::write(
        &list,
        r#"[{"gate_id": "build", "task_id": "ABC-1", "expires_at": "2026-12-31", "approved_by": "lead"}]"#,
    )
    .unwrap();
    let waivers = load_waivers(&list).unwrap();
    assert_eq!(waivers.len(), 1);
    assert_eq!(waivers[0].task_id.as_deref(), Some("ABC-1"));
    assert_eq!(waivers[0].approved_by.as_deref(), Some("lead"));

    let wrapped = dir.path().join("wrapped.json");
    std::fs::write(
        &wrapped,
        r#"{"waivers": [{"gateId": "tests", "taskId": "*", "expiresAt": "2027-01-01T00:00:00Z"}]}"#,
    )
    .unwrap();
    let waivers = load_waivers(&wrapped).unwrap();
    assert_eq!(waivers[0].gate_id, "tests");
    assert_eq!(waivers[0].task_id.as_deref(), Some("*"));
}

#[test]
fn test_load_malformed_file_is_config_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("waivers.json");
    std::fs::write(&path, r#"{"waivers": "all of them"}"#).unwrap();
    let err = load_waivers(&path).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedWaivers { .. }));
}
