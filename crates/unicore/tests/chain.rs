//! Chain wrapper and registry dispatch.

mod common;

use std::rc::Rc;
use std::sync::Arc;

use common::{init_tracing, v};
use serde_json::json;
use unicore::{chain, Applied, Chain, Error, Func, IdCounter, Registry, Value};

#[test]
fn test_collection_pipeline() {
    init_tracing();
    let out = chain(v(json!([[1, 2], [2, 3], [0]])))
        .then("flatten", &[])
        .and_then(|c| c.then("uniq", &[]))
        .and_then(|c| c.then("compact", &[]))
        .unwrap();
    assert_eq!(out.value(), &v(json!([1, 2, 3])));
}

#[test]
fn test_scalar_results_are_unwrapped() {
    let c = chain(v(json!([4, 9, 2])));
    match c.apply("max_value", &[]).unwrap() {
        Applied::Value(max) => assert_eq!(max, Value::from(9)),
        Applied::Chain(other) => panic!("expected a raw value, got {other:?}"),
    }
    assert!(matches!(
        c.apply("contains", &[Value::from(2)]).unwrap(),
        Applied::Value(Value::Bool(true))
    ));
}

#[test]
fn test_path_ops_through_chain() {
    let doc = v(json!({"user": {"name": "ada"}}));
    let c = chain(doc.clone());
    c.apply("set", &[Value::from("user.roles[0]"), Value::from("admin")])
        .unwrap();
    let role = c.apply("get", &[Value::from("user.roles[0]")]).unwrap();
    assert_eq!(role.into_value(), Value::from("admin"));
    let blocked = c
        .apply("get", &[Value::from("__class__"), Value::from("blocked")])
        .unwrap();
    assert_eq!(blocked.into_value(), Value::from("blocked"));
}

#[test]
fn test_template_through_chain() {
    let ctx = v(json!({"name": "Ada", "admin": true}));
    let out = chain("Hello <%= name %>!")
        .apply("template", &[ctx])
        .unwrap()
        .into_value();
    assert_eq!(out, Value::from("Hello Ada!"));
}

#[test]
fn test_mixin_overrides_builtin() {
    let mut registry = Registry::default();
    let shout = Func::new(|args| Ok(Value::from(format!("{}!!", args[0]).to_uppercase())));
    registry.mixin_value(&unicore::registry::mixin_source([("reverse", shout)]));
    let c = Chain::with_registry("abc", Rc::new(registry));
    assert_eq!(c.apply("reverse", &[]).unwrap().into_value(), Value::from("ABC!!"));
    assert_eq!(chain("abc").apply("reverse", &[]).unwrap().into_value(), Value::from("cba"));
}

#[test]
fn test_unique_ids_share_injected_counter() {
    let ids = Arc::new(IdCounter::new());
    let registry = Rc::new(Registry::with_builtins(Arc::clone(&ids)));
    let a = Chain::with_registry("item_", Rc::clone(&registry));
    let first = a.apply("unique_id", &[]).unwrap().into_value();
    let second = a.apply("unique_id", &[]).unwrap().into_value();
    assert_eq!(first, Value::from("item_1"));
    assert_eq!(second, Value::from("item_2"));
    assert_eq!(ids.next("x"), "x3");
}

#[test]
fn test_unknown_function_error() {
    let err = chain(1).apply("definitely_missing", &[]).unwrap_err();
    assert_eq!(err, Error::UnknownFunction("definitely_missing".into()));
}
