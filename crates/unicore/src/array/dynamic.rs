//! Array helpers over dynamic values, including the variadic `first`/`last`
//! calling convention used by the registry.

use unicore_value::{Key, Map, Value};

use super::flatten::{flatten, Depth};
use crate::error::{Error, Result};

/// Variadic `first`.
///
/// A trailing integer argument is taken as the count `n`. The remaining
/// arguments are the collection when they are a single list, or the
/// elements themselves otherwise. Without `n` (or with `n == 1`) the first
/// element is returned, else a list of up to `n` elements. A genuine integer
/// element in last position is indistinguishable from a count:
/// `first_args([1, 2, 3])` yields `[1, 2]`.
pub fn first_args(args: &[Value]) -> Value {
    let Some(tail) = args.last() else {
        return Value::Null;
    };
    let (n, args) = match tail {
        Value::Int(n) => (Some(*n), &args[..args.len() - 1]),
        _ => (None, args),
    };
    let empty = || match n {
        None => Value::Null,
        Some(_) => Value::empty_list(),
    };
    let items = match args {
        [] | [Value::Null, ..] => return empty(),
        [Value::List(items)] => items.borrow().clone(),
        many => many.to_vec(),
    };
    if items.is_empty() {
        return empty();
    }
    match n {
        None | Some(1) => items[0].clone(),
        Some(n) if n <= 0 => Value::empty_list(),
        Some(n) => Value::list(super::first_n(&items, n)),
    }
}

/// Variadic `last`.
///
/// Unlike [`first_args`], a count is only recognised in the two-argument
/// form `(list, n)`, and any positive `n` (including `1`) yields a list.
pub fn last_args(args: &[Value]) -> Value {
    let (items, n) = match args {
        [] => return Value::Null,
        [Value::Null] => return Value::Null,
        [Value::List(items)] => (items.borrow().clone(), None),
        [single] => (vec![single.clone()], None),
        [Value::List(items), Value::Int(n)] => (items.borrow().clone(), Some(*n)),
        many => (many.to_vec(), None),
    };
    match n {
        None => items.last().cloned().unwrap_or(Value::Null),
        Some(n) if items.is_empty() || n <= 0 => Value::empty_list(),
        Some(n) => Value::list(super::last_n(&items, n)),
    }
}

/// `flatten(list, depth?)` with a dynamic depth argument.
///
/// `true` means one level, an integer means that many levels, and `null`,
/// `false` or an infinite float means every level.
pub fn flatten_args(args: &[Value]) -> Result<Value> {
    let items = match args.first() {
        None | Some(Value::Null) => return Ok(Value::empty_list()),
        Some(Value::List(items)) => items.borrow().clone(),
        Some(other) => {
            return Err(Error::validation(format!(
                "flatten expects a list, got {}",
                other.type_name()
            )))
        }
    };
    let depth = match args.get(1) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Depth::Deep,
        Some(Value::Bool(true)) => Depth::Shallow,
        Some(Value::Int(n)) => Depth::Levels(*n),
        Some(Value::Float(f)) if f.is_infinite() && *f > 0.0 => Depth::Deep,
        Some(other) => {
            return Err(Error::validation(format!(
                "invalid flatten depth of type {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::list(flatten(&items, depth)))
}

/// Drops falsy items.
pub fn compact(items: &[Value]) -> Vec<Value> {
    items.iter().filter(|x| x.truthy()).cloned().collect()
}

/// Reads `key` from every map or object, with `Null` for misses.
pub fn pluck(items: &[Value], key: &str) -> Vec<Value> {
    let key = Key::from(key);
    items
        .iter()
        .map(|item| match item {
            Value::Map(map) => map.borrow().get(&key).cloned(),
            Value::Object(object) => key.as_str().and_then(|k| object.borrow().get(k).cloned()),
            _ => None,
        })
        .map(|v| v.unwrap_or(Value::Null))
        .collect()
}

/// Indexes maps by the value stored under `key`, skipping maps without it.
pub fn index_by_key(items: &[Value], key: &str) -> Result<Map> {
    let key = Key::from(key);
    let mut out = Map::new();
    for item in items {
        let Value::Map(map) = item else { continue };
        let Some(v) = map.borrow().get(&key).cloned() else { continue };
        out.insert(Key::try_from(&v)?, item.clone());
    }
    Ok(out)
}
