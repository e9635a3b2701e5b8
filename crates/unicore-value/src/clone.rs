//! Shallow and deep copies.

use std::collections::HashMap;

use crate::key::Key;
use crate::value::{Object, Value};

/// Creates a shallow copy: a new container holding the same children.
///
/// Scalars and functions are returned as-is.
///
/// # Examples
///
/// ```
/// use unicore_value::{clone, Value};
///
/// let inner = Value::list_from([1]);
/// let original = Value::list(vec![inner.clone()]);
/// let copy = clone(&original);
///
/// assert_eq!(original, copy);
/// assert!(!original.same(&copy));
/// assert!(copy.to_vec().unwrap()[0].same(&inner));
/// ```
pub fn clone(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::list(items.borrow().clone()),
        Value::Map(map) => Value::map(map.borrow().clone()),
        Value::Object(object) => Value::object(object.borrow().clone()),
        other => other.clone(),
    }
}

/// Creates a deep copy of any value.
///
/// Walks the graph with an explicit work stack, so depth is bounded by heap
/// rather than call stack. Every source container is copied exactly once:
/// shared references stay shared in the copy and cycles are re-linked to the
/// copied containers.
///
/// # Examples
///
/// ```
/// use unicore_value::{clone_deep, Value};
///
/// let a = Value::empty_list();
/// a.as_list().unwrap().borrow_mut().push(a.clone());
///
/// let b = clone_deep(&a);
/// let child = b.to_vec().unwrap()[0].clone();
/// assert!(child.same(&b));
/// assert!(!b.same(&a));
/// ```
pub fn clone_deep(value: &Value) -> Value {
    DeepCloner::new(None).run(value)
}

/// Like [`clone_deep`], but the customizer gets first refusal at every node.
///
/// When the customizer returns `Some`, that value is used for the node and
/// its children are not visited.
pub fn clone_deep_with(value: &Value, customizer: &CloneCustomizer<'_>) -> Value {
    DeepCloner::new(Some(customizer)).run(value)
}

/// Shallow copy where each direct child may be replaced by the customizer.
///
/// The customizer is first offered the value itself (without key or parent);
/// a `Some` answer replaces the whole result.
pub fn clone_with(value: &Value, customizer: &CloneCustomizer<'_>) -> Value {
    if let Some(replaced) = customizer.call(value, None, None) {
        return replaced;
    }
    let pick = |key: Key, child: &Value| {
        customizer
            .call(child, Some(&key), Some(value))
            .unwrap_or_else(|| child.clone())
    };
    match value {
        Value::List(items) => {
            let items = items.borrow().clone();
            Value::list(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, child)| pick(Key::from(i), child))
                    .collect(),
            )
        }
        Value::Map(map) => {
            let map = map.borrow().clone();
            Value::map(
                map.iter()
                    .map(|(k, child)| (k.clone(), pick(k.clone(), child)))
                    .collect(),
            )
        }
        Value::Object(object) => {
            let object = object.borrow().clone();
            let mut out = Object::new(object.class.clone());
            for (name, child) in object.attrs.iter() {
                out.attrs
                    .insert(name.clone(), pick(Key::from(name.as_str()), child));
            }
            Value::object(out)
        }
        other => other.clone(),
    }
}

type ValueFn<'a> = Box<dyn Fn(&Value) -> Option<Value> + 'a>;
type KeyedFn<'a> = Box<dyn Fn(&Value, Option<&Key>) -> Option<Value> + 'a>;
type FullFn<'a> = Box<dyn Fn(&Value, Option<&Key>, Option<&Value>) -> Option<Value> + 'a>;

/// A clone customizer with a declared signature.
///
/// `None` from the customizer means "clone this node normally".
pub enum CloneCustomizer<'a> {
    /// `(value)`
    Value(ValueFn<'a>),
    /// `(value, key)`; the key is `None` for the root.
    Keyed(KeyedFn<'a>),
    /// `(value, key, parent)`
    Full(FullFn<'a>),
}

impl<'a> CloneCustomizer<'a> {
    pub fn value(f: impl Fn(&Value) -> Option<Value> + 'a) -> Self {
        CloneCustomizer::Value(Box::new(f))
    }

    pub fn keyed(f: impl Fn(&Value, Option<&Key>) -> Option<Value> + 'a) -> Self {
        CloneCustomizer::Keyed(Box::new(f))
    }

    pub fn full(f: impl Fn(&Value, Option<&Key>, Option<&Value>) -> Option<Value> + 'a) -> Self {
        CloneCustomizer::Full(Box::new(f))
    }

    pub fn call(&self, value: &Value, key: Option<&Key>, parent: Option<&Value>) -> Option<Value> {
        match self {
            CloneCustomizer::Value(f) => f(value),
            CloneCustomizer::Keyed(f) => f(value, key),
            CloneCustomizer::Full(f) => f(value, key, parent),
        }
    }
}

struct DeepCloner<'c, 'a> {
    customizer: Option<&'c CloneCustomizer<'a>>,
    memo: HashMap<usize, Value>,
    stack: Vec<(Value, Value)>,
}

impl<'c, 'a> DeepCloner<'c, 'a> {
    fn new(customizer: Option<&'c CloneCustomizer<'a>>) -> Self {
        DeepCloner {
            customizer,
            memo: HashMap::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self, root: &Value) -> Value {
        let out = self.visit(root, None, None);
        while let Some((src, dst)) = self.stack.pop() {
            self.fill(&src, &dst);
        }
        out
    }

    /// Returns the copy for `src`: a customizer answer, a memoized copy, or
    /// a fresh empty shell queued for filling.
    fn visit(&mut self, src: &Value, key: Option<&Key>, parent: Option<&Value>) -> Value {
        if let Some(customizer) = self.customizer {
            if let Some(replaced) = customizer.call(src, key, parent) {
                return replaced;
            }
        }
        let Some(id) = src.id().filter(|_| src.is_container()) else {
            return src.clone();
        };
        if let Some(done) = self.memo.get(&id) {
            return done.clone();
        }
        let shell = match src {
            Value::List(_) => Value::empty_list(),
            Value::Map(_) => Value::empty_map(),
            Value::Object(object) => Value::object(Object::new(object.borrow().class.clone())),
            other => other.clone(),
        };
        self.memo.insert(id, shell.clone());
        self.stack.push((src.clone(), shell.clone()));
        shell
    }

    fn fill(&mut self, src: &Value, dst: &Value) {
        match (src, dst) {
            (Value::List(items), Value::List(out)) => {
                let items = items.borrow().clone();
                let copied: Vec<Value> = items
                    .iter()
                    .enumerate()
                    .map(|(i, child)| self.visit(child, Some(&Key::from(i)), Some(src)))
                    .collect();
                *out.borrow_mut() = copied;
            }
            (Value::Map(map), Value::Map(out)) => {
                let map = map.borrow().clone();
                for (k, child) in map.iter() {
                    let copied = self.visit(child, Some(k), Some(src));
                    out.borrow_mut().insert(k.clone(), copied);
                }
            }
            (Value::Object(object), Value::Object(out)) => {
                let attrs = object.borrow().attrs.clone();
                for (name, child) in attrs.iter() {
                    let copied = self.visit(child, Some(&Key::from(name.as_str())), Some(src));
                    out.borrow_mut().attrs.insert(name.clone(), copied);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_scalars() {
        assert_eq!(clone_deep(&Value::Null), Value::Null);
        assert_eq!(clone_deep(&Value::from(42)), Value::from(42));
        assert_eq!(clone_deep(&Value::from("hello")), Value::from("hello"));
    }

    #[test]
    fn test_clone_deep_is_distinct() {
        let original = Value::map_from([("foo", Value::list_from([1, 2, 3]))]);
        let copy = clone_deep(&original);
        assert_eq!(original, copy);

        let inner = copy.as_map().unwrap().borrow()[&Key::from("foo")].clone();
        inner.as_list().unwrap().borrow_mut().push(Value::from(4));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_clone_deep_keeps_sharing() {
        let shared = Value::list_from([1]);
        let original = Value::list(vec![shared.clone(), shared]);
        let copy = clone_deep(&original);
        let items = copy.to_vec().unwrap();
        assert!(items[0].same(&items[1]));
        assert!(!items[0].same(&original.to_vec().unwrap()[0]));
    }

    #[test]
    fn test_clone_deep_map_cycle() {
        let a = Value::empty_map();
        a.as_map()
            .unwrap()
            .borrow_mut()
            .insert(Key::from("self"), a.clone());
        let b = clone_deep(&a);
        let inner = b.as_map().unwrap().borrow()[&Key::from("self")].clone();
        assert!(inner.same(&b));
    }

    #[test]
    fn test_clone_deep_object() {
        let p = Value::object(Object::new("Point").with("xs", Value::list_from([1])));
        let q = clone_deep(&p);
        assert_eq!(p, q);
        assert!(!p.same(&q));
    }

    #[test]
    fn test_clone_deep_preserves_order() {
        let original = Value::map_from([("b", 1), ("a", 2), ("c", 3)]);
        let copy = clone_deep(&original);
        let keys: Vec<Key> = copy.as_map().unwrap().borrow().keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("b"), Key::from("a"), Key::from("c")]);
    }

    #[test]
    fn test_clone_deep_with_customizer() {
        let original = Value::map_from([("a", Value::from(1)), ("b", Value::list_from([2, 3]))]);
        let doubled = CloneCustomizer::value(|v| v.as_int().map(|i| Value::from(i * 2)));
        let copy = clone_deep_with(&original, &doubled);
        assert_eq!(
            copy,
            Value::map_from([("a", Value::from(2)), ("b", Value::list_from([4, 6]))])
        );
    }

    #[test]
    fn test_clone_deep_with_keyed() {
        let original = Value::map_from([("secret", "x"), ("name", "y")]);
        let mask = CloneCustomizer::keyed(|_, key| {
            (key == Some(&Key::from("secret"))).then(|| Value::from("***"))
        });
        assert_eq!(
            clone_deep_with(&original, &mask),
            Value::map_from([("secret", "***"), ("name", "y")])
        );
    }

    #[test]
    fn test_clone_with_is_shallow() {
        let nested = Value::list_from([1]);
        let original = Value::list(vec![Value::from(1), nested.clone()]);
        let bump = CloneCustomizer::full(|v, key, parent| {
            parent?;
            key?;
            v.as_int().map(|i| Value::from(i + 10))
        });
        let copy = clone_with(&original, &bump);
        let items = copy.to_vec().unwrap();
        assert_eq!(items[0], Value::from(11));
        assert!(items[1].same(&nested));
    }
}
