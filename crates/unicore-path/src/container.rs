//! Per-kind child access.
//!
//! Every traversal step dispatches on the concrete container kind through
//! [`Container`]; each kind implements [`Children`].

use unicore_value::{Key, Map, Object, Shared, Value};

use crate::error::PathError;

/// Longest run of `Null` padding a single list write may add.
pub const MAX_LIST_PADDING: usize = 1 << 20;

pub trait Children {
    /// Raw member lookup, functions included.
    fn member(&self, key: &Key) -> Option<Value>;

    /// Member lookup as seen by path reads.
    fn child(&self, key: &Key) -> Option<Value> {
        self.member(key)
    }

    /// Writes a member; sequences are padded with nulls up to the index.
    fn assign(&self, key: &Key, value: Value) -> Result<(), PathError>;

    /// Removes a member, reporting whether it existed.
    fn remove(&self, key: &Key) -> bool;
}

impl Children for Shared<Map> {
    fn member(&self, key: &Key) -> Option<Value> {
        let map = self.borrow();
        if let Some(v) = map.get(key) {
            return Some(v.clone());
        }
        key.coerced().and_then(|alt| map.get(&alt).cloned())
    }

    fn assign(&self, key: &Key, value: Value) -> Result<(), PathError> {
        self.borrow_mut().insert(key.clone(), value);
        Ok(())
    }

    fn remove(&self, key: &Key) -> bool {
        let mut map = self.borrow_mut();
        if map.shift_remove(key).is_some() {
            return true;
        }
        key.coerced()
            .is_some_and(|alt| map.shift_remove(&alt).is_some())
    }
}

/// Resolves `key` against a sequence of `len` items, allowing negative
/// indices from the end.
pub fn resolve_index(key: &Key, len: usize) -> Option<usize> {
    let idx = key.as_index()?;
    let len = len as i64;
    let idx = if idx < 0 { idx + len } else { idx };
    (0..len).contains(&idx).then_some(idx as usize)
}

impl Children for Shared<Vec<Value>> {
    fn member(&self, key: &Key) -> Option<Value> {
        let items = self.borrow();
        resolve_index(key, items.len()).map(|i| items[i].clone())
    }

    fn assign(&self, key: &Key, value: Value) -> Result<(), PathError> {
        let idx = key
            .as_index()
            .ok_or_else(|| PathError::InvalidIndex(key.clone()))?;
        let mut items = self.borrow_mut();
        if idx < 0 {
            let slot = resolve_index(key, items.len())
                .ok_or_else(|| PathError::InvalidIndex(key.clone()))?;
            items[slot] = value;
            return Ok(());
        }
        let idx = usize::try_from(idx).map_err(|_| PathError::InvalidIndex(key.clone()))?;
        if items.len() <= idx {
            let grow = idx - items.len() + 1;
            if grow > MAX_LIST_PADDING || items.try_reserve(grow).is_err() {
                return Err(PathError::InvalidIndex(key.clone()));
            }
            items.resize(idx + 1, Value::Null);
        }
        items[idx] = value;
        Ok(())
    }

    fn remove(&self, key: &Key) -> bool {
        let mut items = self.borrow_mut();
        match key.as_index() {
            Some(idx) if idx >= 0 && (idx as usize) < items.len() => {
                items.remove(idx as usize);
                true
            }
            _ => false,
        }
    }
}

impl Children for Shared<Object> {
    fn member(&self, key: &Key) -> Option<Value> {
        self.borrow().get(&key.to_string()).cloned()
    }

    /// Methods are never exposed to path reads.
    fn child(&self, key: &Key) -> Option<Value> {
        self.member(key).filter(|v| !matches!(v, Value::Func(_)))
    }

    fn assign(&self, key: &Key, value: Value) -> Result<(), PathError> {
        self.borrow_mut().set(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &Key) -> bool {
        self.borrow_mut()
            .attrs
            .shift_remove(&key.to_string())
            .is_some()
    }
}

fn exact_index(key: &Key) -> Option<usize> {
    key.as_int().and_then(|i| usize::try_from(i).ok())
}

/// A value that can hold children.
#[derive(Debug, Clone)]
pub enum Container {
    Map(Shared<Map>),
    List(Shared<Vec<Value>>),
    Object(Shared<Object>),
}

impl Container {
    pub fn of(value: &Value) -> Option<Container> {
        match value {
            Value::Map(m) => Some(Container::Map(m.clone())),
            Value::List(l) => Some(Container::List(l.clone())),
            Value::Object(o) => Some(Container::Object(o.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Container::Map(m) => Value::Map(m.clone()),
            Container::List(l) => Value::List(l.clone()),
            Container::Object(o) => Value::Object(o.clone()),
        }
    }

    fn children(&self) -> &dyn Children {
        match self {
            Container::Map(m) => m as &dyn Children,
            Container::List(l) => l as &dyn Children,
            Container::Object(o) => o as &dyn Children,
        }
    }

    pub fn member(&self, key: &Key) -> Option<Value> {
        self.children().member(key)
    }

    pub fn child(&self, key: &Key) -> Option<Value> {
        self.children().child(key)
    }

    pub fn assign(&self, key: &Key, value: Value) -> Result<(), PathError> {
        self.children().assign(key, value)
    }

    pub fn remove(&self, key: &Key) -> bool {
        self.children().remove(key)
    }

    /// Member lookup with no key coercion: maps match the key exactly,
    /// lists take only in-range non-negative integers.
    pub fn exact_member(&self, key: &Key) -> Option<Value> {
        match self {
            Container::Map(m) => m.borrow().get(key).cloned(),
            Container::List(l) => exact_index(key).and_then(|i| l.borrow().get(i).cloned()),
            Container::Object(o) => o.borrow().get(&key.to_string()).cloned(),
        }
    }

    /// [`remove`](Self::remove) with the lookup rules of
    /// [`exact_member`](Self::exact_member).
    pub fn remove_exact(&self, key: &Key) -> bool {
        match self {
            Container::Map(m) => m.borrow_mut().shift_remove(key).is_some(),
            Container::List(l) => {
                let mut items = l.borrow_mut();
                match exact_index(key) {
                    Some(i) if i < items.len() => {
                        items.remove(i);
                        true
                    }
                    _ => false,
                }
            }
            Container::Object(o) => o.borrow_mut().attrs.shift_remove(&key.to_string()).is_some(),
        }
    }

    /// Steps into the child at `key`, replacing a missing or non-container
    /// child with `make()`.
    pub fn descend(&self, key: &Key, make: impl FnOnce() -> Value) -> Result<Container, PathError> {
        if let Some(existing) = self.child(key).as_ref().and_then(Container::of) {
            return Ok(existing);
        }
        let fresh = make();
        let container =
            Container::of(&fresh).ok_or(PathError::NotContainer(fresh.type_name()))?;
        self.assign(key, fresh)?;
        Ok(container)
    }
}
