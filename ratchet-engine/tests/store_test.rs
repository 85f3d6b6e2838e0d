//! Persisted state files.

use chrono::{TimeZone, Utc};

use ratchet_core::errors::StorageError;
use ratchet_engine::patterns::{PatternRecord, PatternState, Recommendation};
use ratchet_engine::scorecard::Scorecard;
use ratchet_engine::store::StateStore;

#[test]
fn test_missing_files_read_as_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join(".quality"));
    assert_eq!(store.load_scorecard().unwrap(), Scorecard::default());
    assert_eq!(store.load_patterns().unwrap(), PatternState::default());
    assert!(store.load_verification().unwrap().is_none());
    assert!(!store.is_paused());
}

#[test]
fn test_state_round_trips_and_creates_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("nested/.quality"));

    let scorecard = Scorecard {
        overall: 87.5,
        coverage: 81.25,
        coverage_floor: 79.25,
        coverage_qualified: true,
        updated_at: Some(Utc.with_ymd_and_hms(2026, 2, 2, 8, 30, 0).unwrap()),
        ..Default::default()
    };
    store.save_scorecard(&scorecard).unwrap();
    assert_eq!(store.load_scorecard().unwrap(), scorecard);

    let mut patterns = PatternState::default();
    patterns.patterns.insert(
        "ts-any".to_string(),
        PatternRecord {
            count: 4,
            last_seen: None,
            recommendation: Recommendation::ClaudeRule,
        },
    );
    store.save_patterns(&patterns).unwrap();
    assert_eq!(store.load_patterns().unwrap(), patterns);

    let text = std::fs::read_to_string(store.dir().join("patterns.json")).unwrap();
    assert!(text.contains("\"claude_rule\""));
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("scorecard.json"), "{ nope").unwrap();
    let store = StateStore::new(dir.path());
    assert!(matches!(
        store.load_scorecard(),
        Err(StorageError::Corrupt { .. })
    ));
}

#[test]
fn test_partial_scorecard_fills_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("scorecard.json"), r#"{"coverage_floor": 64.5}"#).unwrap();
    let store = StateStore::new(dir.path());
    let card = store.load_scorecard().unwrap();
    assert_eq!(card.coverage_floor, 64.5);
    assert!(card.history.is_empty());
}

#[test]
fn test_pause_flag_detected() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("PAUSED"), "").unwrap();
    assert!(StateStore::new(dir.path()).is_paused());
}
