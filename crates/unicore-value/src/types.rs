//! Type predicates.

use crate::equal::deep_equal;
use crate::key::Key;
use crate::value::Value;

pub fn is_string(value: &Value) -> bool {
    matches!(value, Value::Str(_))
}

/// Ints and floats (booleans are not numbers).
pub fn is_number(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Float(_))
}

pub fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Int(_))
}

pub fn is_array(value: &Value) -> bool {
    matches!(value, Value::List(_))
}

/// `true` for maps only; attributed objects answer [`is_instance`].
pub fn is_object(value: &Value) -> bool {
    matches!(value, Value::Map(_))
}

pub fn is_map(value: &Value) -> bool {
    is_object(value)
}

/// `true` for attributed objects, optionally restricted to one class.
pub fn is_instance(value: &Value, class: Option<&str>) -> bool {
    match value {
        Value::Object(object) => class.map_or(true, |c| object.borrow().class == c),
        _ => false,
    }
}

pub fn is_function(value: &Value) -> bool {
    matches!(value, Value::Func(_))
}

pub fn is_boolean(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

pub fn is_null(value: &Value) -> bool {
    value.is_null()
}

/// There is no separate "undefined"; same as [`is_null`].
pub fn is_undefined(value: &Value) -> bool {
    value.is_null()
}

pub fn is_finite(value: &Value) -> bool {
    match value {
        Value::Int(_) => true,
        Value::Float(f) => f.is_finite(),
        _ => false,
    }
}

pub fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Float(f) if f.is_nan())
}

/// Checks if a value is empty.
///
/// Values without a length (null, booleans, numbers, functions) count as
/// empty.
///
/// # Examples
///
/// ```
/// use unicore_value::{is_empty, Value};
///
/// assert!(is_empty(&Value::empty_list()));
/// assert!(is_empty(&Value::from(7)));
/// assert!(!is_empty(&Value::from("x")));
/// ```
pub fn is_empty(value: &Value) -> bool {
    value.len().map_or(true, |len| len == 0)
}

/// Deep equality; see [`deep_equal`].
pub fn is_equal(a: &Value, b: &Value) -> bool {
    deep_equal(a, b)
}

/// `true` when every key of `source` is present in `object` with a deeply
/// equal value. An empty source matches anything.
pub fn is_match(object: &Value, source: &Value) -> bool {
    let Value::Map(source) = source else {
        return deep_equal(object, source);
    };
    let source = source.borrow();
    source.iter().all(|(key, expected)| match lookup(object, key) {
        Some(actual) => deep_equal(&actual, expected),
        None => false,
    })
}

fn lookup(object: &Value, key: &Key) -> Option<Value> {
    match object {
        Value::Map(map) => map.borrow().get(key).cloned(),
        Value::Object(o) => key.as_str().and_then(|name| o.borrow().get(name).cloned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn test_number_predicates() {
        assert!(is_number(&Value::from(1)));
        assert!(is_number(&Value::from(1.5)));
        assert!(!is_number(&Value::from(true)));
        assert!(is_finite(&Value::from(3)));
        assert!(!is_finite(&Value::from(f64::INFINITY)));
        assert!(is_nan(&Value::from(f64::NAN)));
        assert!(!is_nan(&Value::from(1)));
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&Value::from("")));
        assert!(is_empty(&Value::empty_map()));
        assert!(!is_empty(&Value::list_from([0])));
        assert!(is_empty(&Value::object(Object::new("Blank"))));
    }

    #[test]
    fn test_is_instance() {
        let p = Value::object(Object::new("Point"));
        assert!(is_instance(&p, None));
        assert!(is_instance(&p, Some("Point")));
        assert!(!is_instance(&p, Some("Line")));
        assert!(!is_object(&p));
    }

    #[test]
    fn test_is_match() {
        let user = Value::map_from([
            ("name", Value::from("moe")),
            ("age", Value::from(40)),
        ]);
        assert!(is_match(&user, &Value::map_from([("age", 40)])));
        assert!(!is_match(&user, &Value::map_from([("age", 41)])));
        assert!(!is_match(&user, &Value::map_from([("missing", 1)])));
        assert!(is_match(&user, &Value::empty_map()));
    }
}
