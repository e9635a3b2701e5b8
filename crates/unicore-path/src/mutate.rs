//! In-place writes: `set`, `set_with`, `update`, `update_with`, `unset`.

use tracing::warn;
use unicore_value::{Key, Value};

use crate::access::get;
use crate::container::Container;
use crate::error::PathError;
use crate::parse::IntoPath;
use crate::restricted::find_restricted;

fn check_writable(obj: &Value, parts: &[Key]) -> Result<Container, PathError> {
    if let Some(name) = find_restricted(parts) {
        warn!(key = name, "restricted path segment rejected on write");
        return Err(PathError::AccessDenied(name.to_string()));
    }
    Container::of(obj).ok_or(PathError::NotContainer(obj.type_name()))
}

fn set_parts(
    obj: &Value,
    parts: &[Key],
    value: Value,
    make: &dyn Fn(&Key) -> Value,
) -> Result<Value, PathError> {
    let Some((last, init)) = parts.split_last() else {
        return Ok(obj.clone());
    };
    let mut cur = check_writable(obj, parts)?;
    for (i, seg) in init.iter().enumerate() {
        cur = cur.descend(seg, || make(&parts[i + 1]))?;
    }
    cur.assign(last, value)?;
    Ok(obj.clone())
}

/// Sets `value` at `path`, creating intermediate containers.
///
/// A missing (or non-container) intermediate becomes a list when the next
/// segment is an integer and a map otherwise; lists are padded with `Null`.
/// Mutates `obj` in place and returns the same handle.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore_path::set;
/// use unicore_value::Value;
///
/// let obj = Value::from(json!({}));
/// set(&obj, "x[1].y", Value::from(5)).unwrap();
/// assert_eq!(obj, Value::from(json!({"x": [null, {"y": 5}]})));
/// ```
pub fn set(obj: &Value, path: impl IntoPath, value: Value) -> Result<Value, PathError> {
    let parts = path.into_path();
    set_parts(obj, &parts, value, &|next: &Key| {
        if matches!(next, Key::Int(_)) {
            Value::empty_list()
        } else {
            Value::empty_map()
        }
    })
}

/// Like [`set`], but missing intermediates are produced by `make`.
pub fn set_with(
    obj: &Value,
    path: impl IntoPath,
    value: Value,
    make: impl Fn() -> Value,
) -> Result<Value, PathError> {
    let parts = path.into_path();
    set_parts(obj, &parts, value, &|_: &Key| make())
}

/// Replaces the value at `path` with `updater(current)`, where a missing
/// value reads as `Null`.
pub fn update(
    obj: &Value,
    path: impl IntoPath,
    updater: impl FnOnce(Value) -> Value,
) -> Result<Value, PathError> {
    let parts = path.into_path();
    if parts.is_empty() {
        return Ok(obj.clone());
    }
    let current = get(obj, &parts, Value::Null)?;
    set(obj, parts, updater(current))
}

/// [`update`] with custom intermediate containers, as in [`set_with`].
pub fn update_with(
    obj: &Value,
    path: impl IntoPath,
    updater: impl FnOnce(Value) -> Value,
    make: impl Fn() -> Value,
) -> Result<Value, PathError> {
    let parts = path.into_path();
    if parts.is_empty() {
        return Ok(obj.clone());
    }
    let current = get(obj, &parts, Value::Null)?;
    set_with(obj, parts, updater(current), make)
}

/// Removes the key, index or attribute at `path`.
///
/// Returns whether something was removed. Never fails: misses, restricted
/// segments and the empty path all report `false`.
///
/// Unlike reads, every segment must match exactly: map keys are not
/// coerced between `1` and `"1"`, and list segments must be non-negative
/// in-range integers.
pub fn unset(obj: &Value, path: impl IntoPath) -> bool {
    let parts = path.into_path();
    let Some((last, init)) = parts.split_last() else {
        return false;
    };
    if find_restricted(&parts).is_some() {
        return false;
    }
    let mut cur = obj.clone();
    for seg in init {
        let Some(next) = Container::of(&cur).and_then(|c| c.exact_member(seg)) else {
            return false;
        };
        cur = next;
    }
    Container::of(&cur).is_some_and(|parent| parent.remove_exact(last))
}
