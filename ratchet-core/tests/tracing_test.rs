//! Tests for tracing initialization.

use std::sync::Mutex;

use ratchet_core::tracing::init_tracing;

/// Serializes tests that touch `RATCHET_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_per_module_filter_is_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("RATCHET_LOG", "ratchet_engine::verify=debug,ratchet_core=warn");
    init_tracing();
    tracing::debug!(target: "ratchet_engine::verify", "after init");
    std::env::remove_var("RATCHET_LOG");
}

#[test]
fn test_init_tracing_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("RATCHET_LOG", "=not a filter=");
    init_tracing();
    std::env::remove_var("RATCHET_LOG");
}
