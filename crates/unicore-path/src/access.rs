//! Read-only traversal: `get`, `has`, `at`, `invoke_path`.

use tracing::warn;
use unicore_value::{Key, Value};

use crate::container::Container;
use crate::error::PathError;
use crate::parse::IntoPath;
use crate::restricted::find_restricted;

/// Resolves a path, returning `None` on the first failed step.
///
/// An empty path resolves to `obj` itself. A restricted segment resolves to
/// `None` when the root is a map or list, and is an
/// [`AccessDenied`](PathError::AccessDenied) error otherwise.
pub fn try_get(obj: &Value, path: impl IntoPath) -> Result<Option<Value>, PathError> {
    let parts = path.into_path();
    if let Some(name) = find_restricted(&parts) {
        if matches!(obj, Value::Map(_) | Value::List(_)) {
            return Ok(None);
        }
        warn!(key = name, root = obj.type_name(), "restricted path segment rejected");
        return Err(PathError::AccessDenied(name.to_string()));
    }
    Ok(walk(obj, &parts))
}

/// Gets the value at `path`, or `default` when any step misses.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore_path::get;
/// use unicore_value::Value;
///
/// let doc = Value::from(json!({"a": [{"b": {"c": 3}}]}));
/// assert_eq!(get(&doc, "a[0].b.c", Value::Null).unwrap(), Value::from(3));
/// assert_eq!(get(&doc, "a[-1].b.c", Value::Null).unwrap(), Value::from(3));
/// assert_eq!(get(&doc, "a.5.b", Value::from("d")).unwrap(), Value::from("d"));
/// ```
pub fn get(obj: &Value, path: impl IntoPath, default: Value) -> Result<Value, PathError> {
    Ok(try_get(obj, path)?.unwrap_or(default))
}

/// Reports whether `path` resolves. Never fails and never creates anything.
///
/// Restricted segments and the empty path report `false`.
pub fn has(obj: &Value, path: impl IntoPath) -> bool {
    let parts = path.into_path();
    if parts.is_empty() || find_restricted(&parts).is_some() {
        return false;
    }
    walk(obj, &parts).is_some()
}

/// Gets every path in `paths`, with `Null` for misses.
pub fn at<P, I>(obj: &Value, paths: I) -> Result<Vec<Value>, PathError>
where
    P: IntoPath,
    I: IntoIterator<Item = P>,
{
    paths
        .into_iter()
        .map(|path| get(obj, path, Value::Null))
        .collect()
}

/// Calls the function found at `path` with `args`.
///
/// When `obj` is a list and the path does not start with an index, the call
/// is made against every element and the results are collected. Misses
/// (including a non-function at the end of the path) produce `Null`.
pub fn invoke_path(obj: &Value, path: impl IntoPath, args: &[Value]) -> Result<Value, PathError> {
    let parts = path.into_path();
    let Some((last, init)) = parts.split_last() else {
        return Ok(Value::Null);
    };
    if let Some(name) = find_restricted(&parts) {
        warn!(key = name, "restricted path segment rejected");
        return Err(PathError::AccessDenied(name.to_string()));
    }
    let invoke_one = |root: &Value| -> Result<Value, PathError> {
        let Some(parent) = walk(root, init).as_ref().and_then(Container::of) else {
            return Ok(Value::Null);
        };
        match parent.member(last) {
            Some(Value::Func(f)) => Ok(f.call(args)?),
            _ => Ok(Value::Null),
        }
    };
    match obj {
        Value::List(items) if parts[0].as_int().is_none() => {
            let items = items.borrow().clone();
            items
                .iter()
                .map(invoke_one)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::list)
        }
        _ => invoke_one(obj),
    }
}

pub(crate) fn walk(obj: &Value, parts: &[Key]) -> Option<Value> {
    let mut cur = obj.clone();
    for seg in parts {
        let next = Container::of(&cur)?.child(seg)?;
        cur = next;
    }
    Some(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unicore_value::{Func, Object};

    fn doc() -> Value {
        Value::from(json!({"a": [{"b": {"c": 3}}], "n": null}))
    }

    #[test]
    fn test_get_nested() {
        assert_eq!(get(&doc(), "a[0].b.c", Value::Null), Ok(Value::from(3)));
        assert_eq!(get(&doc(), "a.0.b.c", Value::Null), Ok(Value::from(3)));
        assert_eq!(
            get(&doc(), vec![Key::from("a"), Key::Int(0)], Value::Null)
                .unwrap()
                .type_name(),
            "map"
        );
    }

    #[test]
    fn test_get_misses_return_default() {
        let d = Value::from("default");
        assert_eq!(get(&doc(), "a[1].b", d.clone()), Ok(d.clone()));
        assert_eq!(get(&doc(), "n.x", d.clone()), Ok(d.clone()));
        assert_eq!(get(&doc(), "a.b", d.clone()), Ok(d.clone()));
        assert_eq!(get(&doc(), "a[0].b.c.d", d.clone()), Ok(d));
    }

    #[test]
    fn test_get_empty_path_is_root() {
        let d = doc();
        assert!(get(&d, "", Value::Null).unwrap().same(&d));
        assert!(!has(&d, ""));
    }

    #[test]
    fn test_get_int_string_coercion() {
        let m = Value::map_from([(Key::Int(1), "one"), (Key::from("2"), "two")]);
        assert_eq!(get(&m, "1", Value::Null), Ok(Value::from("one")));
        assert_eq!(get(&m, 2i64, Value::Null), Ok(Value::from("two")));
        assert_eq!(get(&m, vec![Key::from("1")], Value::Null), Ok(Value::from("one")));
    }

    #[test]
    fn test_get_tuple_key() {
        let key = Key::Tuple(vec![Key::from("x"), Key::Int(1)]);
        let m = Value::map_from([(key.clone(), "hit")]);
        assert_eq!(get(&m, key, Value::Null), Ok(Value::from("hit")));
        assert_eq!(get(&m, "[('x', 1)]", Value::Null), Ok(Value::from("hit")));
    }

    #[test]
    fn test_restricted_on_containers_is_a_miss() {
        let m = Value::map_from([("__class__", 1)]);
        assert_eq!(get(&m, "__class__", Value::from(0)), Ok(Value::from(0)));
        assert!(!has(&m, "__class__"));
    }

    #[test]
    fn test_restricted_on_objects_is_denied() {
        let p = Value::object(Object::new("P").with("x", 1));
        assert_eq!(
            get(&p, "__class__", Value::Null),
            Err(PathError::AccessDenied("__class__".to_string()))
        );
        assert_eq!(get(&p, "x", Value::Null), Ok(Value::from(1)));
    }

    #[test]
    fn test_object_methods_are_hidden() {
        let p = Value::object(Object::new("P").with("f", Func::new(|_| Ok(Value::Null))));
        assert_eq!(get(&p, "f", Value::from(0)), Ok(Value::from(0)));
        assert!(!has(&p, "f"));
    }

    #[test]
    fn test_has() {
        let d = doc();
        assert!(has(&d, "a[0].b"));
        assert!(has(&d, "n"));
        assert!(!has(&d, "n.x"));
        assert!(!has(&d, "a[3]"));
        assert!(has(&d, "a[-1]"));
    }

    #[test]
    fn test_at() {
        let d = Value::from(json!({"a": [{"b": {"c": 3}}, 4]}));
        assert_eq!(
            at(&d, ["a[0].b.c", "a[1]", "x"]),
            Ok(vec![Value::from(3), Value::from(4), Value::Null])
        );
    }

    #[test]
    fn test_invoke_path() {
        let add = Func::new(|args| {
            let sum: i64 = args.iter().filter_map(Value::as_int).sum();
            Ok(Value::from(sum))
        });
        let d = Value::map_from([("m", Value::map_from([("add", Value::Func(add))]))]);
        assert_eq!(
            invoke_path(&d, "m.add", &[Value::from(1), Value::from(2)]),
            Ok(Value::from(3))
        );
        assert_eq!(invoke_path(&d, "m.nope", &[]), Ok(Value::Null));
    }

    #[test]
    fn test_invoke_path_maps_over_lists() {
        let make = |n: i64| {
            Value::object(Object::new("C").with("get", Func::new(move |_| Ok(Value::from(n)))))
        };
        let items = Value::list(vec![make(1), make(2), Value::from(3)]);
        assert_eq!(
            invoke_path(&items, "get", &[]),
            Ok(Value::list_from([Value::from(1), Value::from(2), Value::Null]))
        );
    }
}
