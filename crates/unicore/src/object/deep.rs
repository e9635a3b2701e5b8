use unicore_value::{Key, Map, Value};

/// A leaf mapper with a declared signature.
pub enum DeepMapper<'a> {
    /// `(leaf)`
    Value(Box<dyn Fn(&Value) -> Value + 'a>),
    /// `(leaf, path)`, the path running from the root to the leaf.
    WithPath(Box<dyn Fn(&Value, &[Key]) -> Value + 'a>),
}

impl<'a> DeepMapper<'a> {
    pub fn value(f: impl Fn(&Value) -> Value + 'a) -> Self {
        DeepMapper::Value(Box::new(f))
    }

    pub fn with_path(f: impl Fn(&Value, &[Key]) -> Value + 'a) -> Self {
        DeepMapper::WithPath(Box::new(f))
    }

    fn call(&self, leaf: &Value, path: &[Key]) -> Value {
        match self {
            DeepMapper::Value(f) => f(leaf),
            DeepMapper::WithPath(f) => f(leaf, path),
        }
    }
}

/// Rebuilds maps and lists with every leaf replaced by `mapper`.
///
/// Objects and functions are leaves. A container reached again through a
/// cycle is handed to the mapper as a leaf instead of being re-entered.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::{map_values_deep, DeepMapper};
/// use unicore_value::Value;
///
/// let doc = Value::from(json!({"a": 1, "b": [2, {"c": 3}]}));
/// let doubled = map_values_deep(&doc, &DeepMapper::value(|v| match v {
///     Value::Int(i) => Value::from(i * 2),
///     other => other.clone(),
/// }));
/// assert_eq!(doubled, Value::from(json!({"a": 2, "b": [4, {"c": 6}]})));
/// ```
pub fn map_values_deep(obj: &Value, mapper: &DeepMapper<'_>) -> Value {
    let mut path = Vec::new();
    let mut active = Vec::new();
    walk(obj, mapper, &mut path, &mut active)
}

fn walk(value: &Value, mapper: &DeepMapper<'_>, path: &mut Vec<Key>, active: &mut Vec<usize>) -> Value {
    let id = match value {
        Value::Map(_) | Value::List(_) => value.id(),
        _ => None,
    };
    let Some(id) = id.filter(|id| !active.contains(id)) else {
        return mapper.call(value, path);
    };
    active.push(id);
    let out = match value {
        Value::Map(map) => {
            let entries = map.borrow().clone();
            let mut rebuilt = Map::with_capacity(entries.len());
            for (k, v) in entries {
                path.push(k.clone());
                rebuilt.insert(k, walk(&v, mapper, path, active));
                path.pop();
            }
            Value::map(rebuilt)
        }
        Value::List(items) => {
            let items = items.borrow().clone();
            let mut rebuilt = Vec::with_capacity(items.len());
            for (i, v) in items.iter().enumerate() {
                path.push(Key::from(i));
                rebuilt.push(walk(v, mapper, path, active));
                path.pop();
            }
            Value::list(rebuilt)
        }
        _ => mapper.call(value, path),
    };
    active.pop();
    out
}
