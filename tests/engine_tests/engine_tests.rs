//! Tests for Engine
//!
//! These tests verify:
//! - Dispatch of each request type to the table
//! - Null responses for GETALL and unknown requests
//! - Key callbacks
//! - Table injection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use sockettable::engine::Engine;
use sockettable::protocol::{Request, RequestType, Response};
use sockettable::Table;

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_update_echoes_value() {
    let engine = Engine::new();

    let response = engine.execute(Request::update("test1", "42"));

    assert_eq!(response, Response::value("test1", "42"));
    assert_eq!(engine.table().get_string("test1", ""), "42");
}

#[test]
fn test_get_present_and_absent() {
    let engine = Engine::new();
    engine.execute(Request::update("test1", "42"));

    assert_eq!(engine.execute(Request::get("test1")), Response::value("test1", "42"));
    assert_eq!(
        engine.execute(Request::get("missing")),
        Response::null(Some("missing".to_string()))
    );
}

#[test]
fn test_delete_returns_removed_value() {
    let engine = Engine::new();
    engine.execute(Request::update("test1", "42"));

    assert_eq!(engine.execute(Request::delete("test1")), Response::value("test1", "42"));
    assert!(engine.execute(Request::get("test1")).is_null());
    assert!(engine.execute(Request::delete("test1")).is_null());
}

#[test]
fn test_sequential_updates_keep_last_value() {
    let engine = Engine::new();
    engine.execute(Request::update("k", "first"));
    engine.execute(Request::update("k", "second"));

    assert_eq!(engine.table().get_string("k", ""), "second");
    assert_eq!(engine.table().len(), 1);
}

#[test]
fn test_getall_returns_null_and_leaves_table() {
    let engine = Engine::new();
    engine.execute(Request::update("a", "1"));

    let response = engine.execute(Request::GetAll);

    assert_eq!(response, Response::null(None));
    assert_eq!(engine.table().len(), 1);
}

#[test]
fn test_unsupported_request_returns_null_with_key() {
    let engine = Engine::new();
    engine.execute(Request::update("a", "1"));

    let response = engine.execute(Request::Unsupported {
        request: "PATCH".to_string(),
        key: Some("a".to_string()),
    });

    assert_eq!(response, Response::null(Some("a".to_string())));
    assert_eq!(engine.table().get_string("a", ""), "1");
}

// =============================================================================
// Callback Tests
// =============================================================================

#[test]
fn test_callback_sees_value_and_request_type() {
    let engine = Engine::new();
    let seen: Arc<Mutex<Vec<(Option<String>, RequestType)>>> = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&seen);
    engine.set_callback("test1", move |value, request_type| {
        log.lock().push((value.map(str::to_string), request_type));
    });

    engine.execute(Request::update("test1", "42"));
    engine.execute(Request::get("test1"));
    engine.execute(Request::delete("test1"));
    engine.execute(Request::get("test1"));

    assert_eq!(
        *seen.lock(),
        vec![
            (Some("42".to_string()), RequestType::Update),
            (Some("42".to_string()), RequestType::Get),
            (Some("42".to_string()), RequestType::Delete),
            (None, RequestType::Get),
        ]
    );
}

#[test]
fn test_callback_only_for_its_key() {
    let engine = Engine::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    engine.set_callback("watched", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    engine.execute(Request::update("other", "1"));
    engine.execute(Request::GetAll);
    engine.execute(Request::update("watched", "1"));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panicking_callback_does_not_change_response() {
    let engine = Engine::new();
    engine.set_callback("boom", |_, _| panic!("callback failure"));

    let response = engine.execute(Request::update("boom", "1"));

    assert_eq!(response, Response::value("boom", "1"));
    assert_eq!(engine.table().get_string("boom", ""), "1");
    assert_eq!(engine.execute(Request::get("boom")), Response::value("boom", "1"));
}

#[test]
fn test_unsupported_request_skips_callback() {
    let engine = Engine::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    engine.set_callback("k", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    engine.execute(Request::Unsupported {
        request: "PATCH".to_string(),
        key: Some("k".to_string()),
    });

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_remove_callback() {
    let engine = Engine::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    engine.set_callback("k", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(engine.remove_callback("k"));
    assert!(!engine.remove_callback("k"));

    engine.execute(Request::update("k", "v"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Table Injection Tests
// =============================================================================

#[test]
fn test_engine_over_injected_table() {
    let table = Arc::new(Table::new());
    table.update_bool("flag", true);

    let engine = Engine::with_table(Arc::clone(&table));
    engine.execute(Request::update("count", "3"));

    assert_eq!(engine.execute(Request::get("flag")), Response::value("flag", "true"));
    assert_eq!(table.get_int("count", 0), 3);
}

#[test]
fn test_engines_do_not_share_tables() {
    let first = Engine::new();
    let second = Engine::new();

    first.execute(Request::update("k", "v"));

    assert!(second.execute(Request::get("k")).is_null());
}
