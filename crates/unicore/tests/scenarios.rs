//! End-to-end scenarios across path access, merging and debouncing.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::{init_tracing, v};
use serde_json::json;
use unicore::function::debounce;
use unicore::{get, has, merge, set, unset, Value};

#[test]
fn test_get_nested_index() {
    init_tracing();
    let doc = v(json!({"a": {"b": [1, 2, 3]}}));
    assert_eq!(get(&doc, "a.b[1]", Value::Null).unwrap(), Value::from(2));
}

#[test]
fn test_set_creates_intermediate_containers() {
    let doc = Value::empty_map();
    set(&doc, "a[0].b", Value::from("x")).unwrap();
    assert_eq!(doc, v(json!({"a": [{"b": "x"}]})));
}

#[test]
fn test_unset_leaves_empty_parent() {
    let doc = v(json!({"a": [{"b": {"c": 7}}]}));
    assert!(unset(&doc, "a[0].b.c"));
    assert_eq!(doc, v(json!({"a": [{"b": {}}]})));
    assert!(!unset(&doc, "a[0].b.c"));
}

#[test]
fn test_merge_later_sources_win() {
    let out = merge(&[v(json!({"a": 1})), v(json!({"b": 2})), v(json!({"a": 4}))]);
    assert_eq!(out, v(json!({"a": 4, "b": 2})));
}

#[test]
fn test_restricted_key_reads_default() {
    let doc = v(json!({"a": 1}));
    let out = get(&doc, "__class__", Value::from("blocked")).unwrap();
    assert_eq!(out, Value::from("blocked"));
    assert!(!has(&doc, "__class__"));
}

#[test]
fn test_set_then_get_round_trips() {
    let doc = v(json!({"x": [0, {"y": null}]}));
    for (path, value) in [("x[1].y", json!(5)), ("x[0]", json!("z")), ("p.q.r", json!([1]))] {
        set(&doc, path, v(value.clone())).unwrap();
        assert_eq!(get(&doc, path, Value::Null).unwrap(), v(value));
    }
}

#[test]
fn test_debounce_collapses_close_calls() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let debounced = debounce(
        move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
        Duration::from_millis(100),
    );

    debounced.call(());
    thread::sleep(Duration::from_millis(10));
    let second = Instant::now();
    debounced.call(());

    thread::sleep(Duration::from_millis(40));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    while calls.load(Ordering::SeqCst) == 0 && second.elapsed() < Duration::from_secs(2) {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(second.elapsed() >= Duration::from_millis(100));
    thread::sleep(Duration::from_millis(150));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
