//! Helpers over maps, attributed objects and other keyed values.
//!
//! Anything with entries can be read: maps by key, lists by index and
//! objects by attribute name. Scalars have no entries. Functions that build
//! a result return a new map; `extend`, `assign`, `assign_with`, `defaults`
//! and `defaults_deep` write into their target.

mod convert;
mod deep;
mod merge;

use std::cmp::Ordering;

use indexmap::map::Entry;
use indexmap::IndexMap;
use unicore_path::{is_restricted, set, try_get, unset, Container, IntoPath, PathError};
use unicore_value::{clone_deep, compare_total, Key, Map, Object, Shared, Value};

use crate::error::{Error, Result};

pub use self::map_values as map_object;
pub use self::extend as assign;
pub use convert::{parse_int, to_boolean, to_boolean_with, to_integer, to_number};
pub use deep::{map_values_deep, DeepMapper};
pub use merge::{defaults_deep, merge, merge_with, MergeCustomizer};
pub use unicore_value::is_match;

/// Key/value pairs of a map, list (by index) or object (by attribute).
pub fn pairs(obj: &Value) -> Vec<(Key, Value)> {
    match obj {
        Value::Map(map) => map
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        Value::List(items) => items
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| (Key::from(i), v.clone()))
            .collect(),
        Value::Object(object) => object
            .borrow()
            .attrs
            .iter()
            .map(|(k, v)| (Key::from(k), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

/// [`pairs`] as a list of `[key, value]` lists.
pub fn to_pairs(obj: &Value) -> Value {
    Value::list(
        pairs(obj)
            .into_iter()
            .map(|(k, v)| Value::list(vec![Value::from(k), v]))
            .collect(),
    )
}

pub fn keys(obj: &Value) -> Vec<Key> {
    pairs(obj).into_iter().map(|(k, _)| k).collect()
}

pub fn values(obj: &Value) -> Vec<Value> {
    pairs(obj).into_iter().map(|(_, v)| v).collect()
}

fn entries_map(obj: &Value) -> Map {
    pairs(obj).into_iter().collect()
}

fn target_map(target: &Value) -> Result<&Shared<Map>> {
    target.as_map().ok_or_else(|| {
        Error::validation(format!("expected a map target, got {}", target.type_name()))
    })
}

/// Swaps keys and values; later duplicates win. Values must be hashable.
pub fn invert(obj: &Value) -> Result<Value> {
    let mut out = Map::new();
    for (k, v) in pairs(obj) {
        out.insert(Key::try_from(&v)?, Value::from(k));
    }
    Ok(Value::map(out))
}

/// Groups keys under `f(value)`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::invert_by;
/// use unicore_value::Value;
///
/// let scores = Value::from(json!({"a": 1, "b": 2, "c": 1}));
/// let out = invert_by(&scores, |v| Value::from(format!("s{v}"))).unwrap();
/// assert_eq!(out, Value::from(json!({"s1": ["a", "c"], "s2": ["b"]})));
/// ```
pub fn invert_by(obj: &Value, mut f: impl FnMut(&Value) -> Value) -> Result<Value> {
    let mut groups: IndexMap<Key, Vec<Value>> = IndexMap::new();
    for (k, v) in pairs(obj) {
        let group = Key::try_from(&f(&v))?;
        groups.entry(group).or_default().push(Value::from(k));
    }
    Ok(Value::map(
        groups.into_iter().map(|(k, ks)| (k, Value::list(ks))).collect(),
    ))
}

/// Copies every entry of `sources` into the `target` map, overwriting.
pub fn extend(target: &Value, sources: &[Value]) -> Result<Value> {
    let map = target_map(target)?;
    for src in sources {
        let entries = pairs(src);
        map.borrow_mut().extend(entries);
    }
    Ok(target.clone())
}

/// Like [`extend`], but each assignment goes through `customizer`
/// (`(target value, source value, key, target)`); `None` keeps the source
/// value.
pub fn assign_with(
    target: &Value,
    sources: &[Value],
    customizer: &MergeCustomizer<'_>,
) -> Result<Value> {
    let map = target_map(target)?;
    for src in sources {
        for (k, v) in pairs(src) {
            let current = map.borrow().get(&k).cloned().unwrap_or(Value::Null);
            let chosen = customizer
                .call(&current, &v, Some(&k), Some(target))
                .unwrap_or(v);
            map.borrow_mut().insert(k, chosen);
        }
    }
    Ok(target.clone())
}

/// Copies entries of `sources` whose keys are absent from `target`.
pub fn defaults(target: &Value, sources: &[Value]) -> Result<Value> {
    let map = target_map(target)?;
    for src in sources {
        for (k, v) in pairs(src) {
            if let Entry::Vacant(slot) = map.borrow_mut().entry(k) {
                slot.insert(v);
            }
        }
    }
    Ok(target.clone())
}

/// Builds a map holding only the given paths.
///
/// Deep paths (`"a.b[0]"`) are rebuilt in the result; paths that do not
/// resolve are skipped.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::pick;
/// use unicore_value::Value;
///
/// let doc = Value::from(json!({"a": 1, "b": {"c": 2, "d": 3}, "e": 4}));
/// assert_eq!(pick(&doc, ["a", "b.c", "zz"]).unwrap(), Value::from(json!({"a": 1, "b": {"c": 2}})));
/// ```
pub fn pick<P, I>(obj: &Value, paths: I) -> Result<Value>
where
    P: IntoPath,
    I: IntoIterator<Item = P>,
{
    let out = Value::empty_map();
    for path in paths {
        let parts = path.into_path();
        if parts.is_empty() {
            continue;
        }
        if let Some(v) = try_get(obj, parts.as_slice())? {
            set(&out, parts, v)?;
        }
    }
    Ok(out)
}

pub fn pick_by(obj: &Value, mut predicate: impl FnMut(&Value, &Key) -> bool) -> Value {
    Value::map(
        pairs(obj)
            .into_iter()
            .filter(|(k, v)| predicate(v, k))
            .collect(),
    )
}

/// A map of every entry except the given paths. Deep paths are removed from
/// a deep copy, so `obj` is never modified.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::omit;
/// use unicore_value::Value;
///
/// let doc = Value::from(json!({"a": 1, "b": {"c": 2, "d": 3}}));
/// assert_eq!(omit(&doc, ["a", "b.c"]), Value::from(json!({"b": {"d": 3}})));
/// assert_eq!(doc, Value::from(json!({"a": 1, "b": {"c": 2, "d": 3}})));
/// ```
pub fn omit<P, I>(obj: &Value, paths: I) -> Value
where
    P: IntoPath,
    I: IntoIterator<Item = P>,
{
    let paths: Vec<Vec<Key>> = paths.into_iter().map(IntoPath::into_path).collect();
    let base = Value::map(entries_map(obj));
    let out = if paths.iter().any(|p| p.len() > 1) {
        clone_deep(&base)
    } else {
        base
    };
    for parts in paths {
        match parts.as_slice() {
            [] => {}
            [key] => {
                if let Some(c) = Container::of(&out) {
                    c.remove(key);
                }
            }
            _ => {
                unset(&out, parts.as_slice());
            }
        }
    }
    out
}

pub fn omit_by(obj: &Value, mut predicate: impl FnMut(&Value, &Key) -> bool) -> Value {
    pick_by(obj, |v, k| !predicate(v, k))
}

/// Maps every value, keeping keys.
pub fn map_values(obj: &Value, mut f: impl FnMut(&Value) -> Value) -> Value {
    Value::map(pairs(obj).into_iter().map(|(k, v)| (k, f(&v))).collect())
}

/// Reader for one key of maps and attribute of objects, `Null` elsewhere.
///
/// Pairs with the callback-taking helpers:
/// `map_values(&users, property("name"))`.
pub fn property(key: impl Into<Key>) -> impl Fn(&Value) -> Value {
    let key = key.into();
    move |v: &Value| match v {
        Value::Map(map) => map.borrow().get(&key).cloned().unwrap_or(Value::Null),
        Value::Object(object) => key
            .as_str()
            .and_then(|name| object.borrow().get(name).cloned())
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Re-keys every entry with `f(key, value)`; later collisions win.
pub fn map_keys(obj: &Value, mut f: impl FnMut(&Key, &Value) -> Value) -> Result<Value> {
    let mut out = Map::new();
    for (k, v) in pairs(obj) {
        out.insert(Key::try_from(&f(&k, &v))?, v);
    }
    Ok(Value::map(out))
}

/// Renames keys found in `renames`, keeping the rest.
pub fn rename_keys(obj: &Value, renames: &Map) -> Result<Value> {
    let mut out = Map::new();
    for (k, v) in pairs(obj) {
        let k = match renames.get(&k) {
            Some(new) => Key::try_from(new)?,
            None => k,
        };
        out.insert(k, v);
    }
    Ok(Value::map(out))
}

pub fn find_key(obj: &Value, mut predicate: impl FnMut(&Value) -> bool) -> Option<Key> {
    pairs(obj)
        .into_iter()
        .find(|(_, v)| predicate(v))
        .map(|(k, _)| k)
}

pub fn find_last_key(obj: &Value, mut predicate: impl FnMut(&Value) -> bool) -> Option<Key> {
    pairs(obj)
        .into_iter()
        .rev()
        .find(|(_, v)| predicate(v))
        .map(|(k, _)| k)
}

/// Predicate form of [`is_match`].
pub fn matches(source: Value) -> impl Fn(&Value) -> bool {
    move |v: &Value| is_match(v, &source)
}

/// Items matching every property of `props`.
pub fn where_(items: &[Value], props: &Value) -> Vec<Value> {
    items.iter().filter(|x| is_match(x, props)).cloned().collect()
}

/// Length of strings and containers; `0` for everything else.
pub fn size(obj: &Value) -> usize {
    obj.len().unwrap_or(0)
}

/// Values of containers, characters of strings, or `[obj]`.
pub fn to_array(obj: &Value) -> Vec<Value> {
    match obj {
        Value::Str(s) => s.chars().map(|c| Value::from(c.to_string())).collect(),
        Value::List(_) | Value::Map(_) | Value::Object(_) => values(obj),
        other => vec![other.clone()],
    }
}

/// Zips `keys` and `values` into a map.
pub fn object_from(keys: &[Value], values: &[Value]) -> Result<Value> {
    if keys.len() != values.len() {
        return Err(Error::validation(format!(
            "keys and values differ in length ({} != {})",
            keys.len(),
            values.len()
        )));
    }
    let mut out = Map::with_capacity(keys.len());
    for (k, v) in keys.iter().zip(values) {
        out.insert(Key::try_from(k)?, v.clone());
    }
    Ok(Value::map(out))
}

/// Keys holding functions, skipping `__dunder`-style names.
pub fn functions(obj: &Value) -> Result<Vec<Key>> {
    if !matches!(obj, Value::Map(_) | Value::Object(_)) {
        return Err(Error::validation(format!(
            "functions expects a map or object, got {}",
            obj.type_name()
        )));
    }
    Ok(pairs(obj)
        .into_iter()
        .filter(|(k, v)| {
            matches!(v, Value::Func(_)) && !k.as_str().is_some_and(|s| s.starts_with("__"))
        })
        .map(|(k, _)| k)
        .collect())
}

/// Indexes items by `f(item)`; later items win.
pub fn key_by(items: &[Value], mut f: impl FnMut(&Value) -> Value) -> Result<Value> {
    let mut out = Map::new();
    for item in items {
        out.insert(Key::try_from(&f(item))?, item.clone());
    }
    Ok(Value::map(out))
}

/// Groups items into nested maps, one level per key, with lists of items at
/// the leaves.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::nest;
/// use unicore_value::Value;
///
/// let rows = Value::from(json!([
///     {"k": "x", "t": "a"}, {"k": "y", "t": "a"}, {"k": "x", "t": "b"},
/// ])).to_vec().unwrap();
/// assert_eq!(
///     nest(&rows, &["k", "t"]).unwrap(),
///     Value::from(json!({
///         "x": {"a": [{"k": "x", "t": "a"}], "b": [{"k": "x", "t": "b"}]},
///         "y": {"a": [{"k": "y", "t": "a"}]},
///     })),
/// );
/// ```
pub fn nest(items: &[Value], keys: &[&str]) -> Result<Value> {
    let out = Value::empty_map();
    let Some((last, init)) = keys.split_last() else {
        return Ok(out);
    };
    for item in items {
        let mut level = out.clone();
        for k in init {
            let key = Key::try_from(&property(*k)(item))?;
            let map = target_map(&level)?.clone();
            let next = map.borrow_mut().entry(key).or_insert_with(Value::empty_map).clone();
            level = next;
        }
        let key = Key::try_from(&property(*last)(item))?;
        let map = target_map(&level)?.clone();
        let bucket = map.borrow_mut().entry(key).or_insert_with(Value::empty_list).clone();
        match bucket {
            Value::List(list) => list.borrow_mut().push(item.clone()),
            other => {
                return Err(Error::validation(format!(
                    "nest bucket is a {}, not a list",
                    other.type_name()
                )))
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Stable multi-key sort. `orders` pairs up with `iteratees`; missing
/// entries sort ascending.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::{order_by, property, SortOrder};
/// use unicore_value::Value;
///
/// let rows = Value::from(json!([
///     {"n": "b", "a": 1}, {"n": "a", "a": 2}, {"n": "a", "a": 1},
/// ])).to_vec().unwrap();
/// let by_n = property("n");
/// let by_a = property("a");
/// let sorted = order_by(&rows, &[&by_n, &by_a], &[SortOrder::Asc, SortOrder::Desc]);
/// assert_eq!(
///     Value::list(sorted),
///     Value::from(json!([{"n": "a", "a": 2}, {"n": "a", "a": 1}, {"n": "b", "a": 1}])),
/// );
/// ```
pub fn order_by(
    items: &[Value],
    iteratees: &[&dyn Fn(&Value) -> Value],
    orders: &[SortOrder],
) -> Vec<Value> {
    let mut keyed: Vec<(Vec<Value>, Value)> = items
        .iter()
        .map(|item| (iteratees.iter().map(|f| f(item)).collect(), item.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            let ord = match orders.get(i).copied().unwrap_or_default() {
                SortOrder::Asc => compare_total(x, y),
                SortOrder::Desc => compare_total(y, x),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Calls `f(value, key, obj)` for each entry until it returns `false`.
pub fn for_in(obj: &Value, mut f: impl FnMut(&Value, &Key, &Value) -> bool) -> Value {
    for (k, v) in pairs(obj) {
        if !f(&v, &k, obj) {
            break;
        }
    }
    obj.clone()
}

/// [`for_in`] from the last entry backwards.
pub fn for_in_right(obj: &Value, mut f: impl FnMut(&Value, &Key, &Value) -> bool) -> Value {
    for (k, v) in pairs(obj).into_iter().rev() {
        if !f(&v, &k, obj) {
            break;
        }
    }
    obj.clone()
}

/// Folds entries into `accumulator` through `f(acc, value, key)`, which
/// mutates the accumulator in place and returns `false` to stop. The default
/// accumulator is an empty map for maps and an empty list otherwise.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::transform;
/// use unicore_value::Value;
///
/// let evens = transform(&Value::from(json!([1, 2, 3, 4])), |acc, v, _| {
///     if v.as_int().is_some_and(|i| i % 2 == 0) {
///         acc.as_list().unwrap().borrow_mut().push(v.clone());
///     }
///     true
/// }, None);
/// assert_eq!(evens, Value::from(json!([2, 4])));
/// ```
pub fn transform(
    obj: &Value,
    mut f: impl FnMut(&Value, &Value, &Key) -> bool,
    accumulator: Option<Value>,
) -> Value {
    let acc = accumulator.unwrap_or_else(|| match obj {
        Value::Map(_) => Value::empty_map(),
        _ => Value::empty_list(),
    });
    for (k, v) in pairs(obj) {
        if !f(&acc, &v, &k) {
            break;
        }
    }
    acc
}

/// A new map holding `proto`'s entries, then `props`' entries.
pub fn create(proto: &Value, props: Option<&Value>) -> Result<Value> {
    let Value::Map(map) = proto else {
        return Err(Error::validation(format!(
            "prototype must be a map, got {}",
            proto.type_name()
        )));
    };
    let mut out = map.borrow().clone();
    if let Some(props) = props {
        out.extend(pairs(props));
    }
    Ok(Value::map(out))
}

/// Reads `key` from `obj`, calling it with `args` when it is a function.
///
/// Misses are `Null`. Restricted introspection names are an access error.
///
/// # Example
///
/// ```
/// use unicore::object::result;
/// use unicore_value::{Func, Value};
///
/// let obj = Value::map_from([
///     ("n", Value::from(2)),
///     ("double", Value::from(Func::new(|args| Ok(Value::from(args[0].as_int().unwrap_or(0) * 2))))),
/// ]);
/// assert_eq!(result(&obj, "n", &[]).unwrap(), Value::from(2));
/// assert_eq!(result(&obj, "double", &[Value::from(21)]).unwrap(), Value::from(42));
/// assert!(result(&obj, "__class__", &[]).is_err());
/// ```
pub fn result(obj: &Value, key: impl Into<Key>, args: &[Value]) -> Result<Value> {
    let key = key.into();
    if is_restricted(&key) {
        return Err(PathError::AccessDenied(key.to_string()).into());
    }
    match Container::of(obj).and_then(|c| c.member(&key)) {
        Some(Value::Func(f)) => Ok(f.call(args)?),
        Some(v) => Ok(v),
        None => Ok(Value::Null),
    }
}

/// Builds an attributed object of `class` from a map's string keys.
pub fn to_object(class: &str, attrs: &Value) -> Value {
    let mut object = Object::new(class);
    for (k, v) in pairs(attrs) {
        if let Key::Str(name) = k {
            object.set(name, v);
        }
    }
    Value::object(object)
}
