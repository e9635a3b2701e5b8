//! Deep merge family: `merge`, `merge_with`, `defaults_deep`.

use std::collections::{HashMap, HashSet};

use unicore_value::{clone_deep, Key, Map, Shared, Value};

type SourceFn<'a> = Box<dyn Fn(&Value) -> Option<Value> + 'a>;
type ValuesFn<'a> = Box<dyn Fn(&Value, &Value) -> Option<Value> + 'a>;
type KeyedFn<'a> = Box<dyn Fn(&Value, &Value, Option<&Key>) -> Option<Value> + 'a>;
type FullFn<'a> = Box<dyn Fn(&Value, &Value, Option<&Key>, Option<&Value>) -> Option<Value> + 'a>;

/// A merge customizer with a declared signature.
///
/// The customizer is offered every merge point first. `None` means "merge
/// this pair normally". Key and parent are `None` for the root pair.
pub enum MergeCustomizer<'a> {
    /// `(src)`
    Source(SourceFn<'a>),
    /// `(obj, src)`
    Values(ValuesFn<'a>),
    /// `(obj, src, key)`
    Keyed(KeyedFn<'a>),
    /// `(obj, src, key, parent)`
    Full(FullFn<'a>),
}

impl<'a> MergeCustomizer<'a> {
    pub fn source(f: impl Fn(&Value) -> Option<Value> + 'a) -> Self {
        MergeCustomizer::Source(Box::new(f))
    }

    pub fn values(f: impl Fn(&Value, &Value) -> Option<Value> + 'a) -> Self {
        MergeCustomizer::Values(Box::new(f))
    }

    pub fn keyed(f: impl Fn(&Value, &Value, Option<&Key>) -> Option<Value> + 'a) -> Self {
        MergeCustomizer::Keyed(Box::new(f))
    }

    pub fn full(
        f: impl Fn(&Value, &Value, Option<&Key>, Option<&Value>) -> Option<Value> + 'a,
    ) -> Self {
        MergeCustomizer::Full(Box::new(f))
    }

    pub fn call(
        &self,
        obj: &Value,
        src: &Value,
        key: Option<&Key>,
        parent: Option<&Value>,
    ) -> Option<Value> {
        match self {
            MergeCustomizer::Source(f) => f(src),
            MergeCustomizer::Values(f) => f(obj, src),
            MergeCustomizer::Keyed(f) => f(obj, src, key),
            MergeCustomizer::Full(f) => f(obj, src, key, parent),
        }
    }
}

/// Builds fresh merged trees. `(left, right)` container pairs are memoized
/// so cyclic operands produce cyclic results instead of looping.
struct Merger<'c, 'a> {
    customizer: Option<&'c MergeCustomizer<'a>>,
    memo: HashMap<(usize, usize), Value>,
}

impl<'c, 'a> Merger<'c, 'a> {
    fn new(customizer: Option<&'c MergeCustomizer<'a>>) -> Self {
        Merger {
            customizer,
            memo: HashMap::new(),
        }
    }

    fn merge(&mut self, a: &Value, b: &Value, key: Option<&Key>, parent: Option<&Value>) -> Value {
        if let Some(customizer) = self.customizer {
            if let Some(v) = customizer.call(a, b, key, parent) {
                return v;
            }
        }
        match (a, b) {
            (Value::Map(am), Value::Map(bm)) => self.merge_maps(am, bm),
            (Value::List(al), Value::List(bl)) => self.merge_lists(a, al, bl),
            (_, Value::Null) => clone_deep(a),
            _ => clone_deep(b),
        }
    }

    fn merge_maps(&mut self, am: &Shared<Map>, bm: &Shared<Map>) -> Value {
        let pair = (am.id(), bm.id());
        if let Some(done) = self.memo.get(&pair) {
            return done.clone();
        }
        let out = Value::empty_map();
        self.memo.insert(pair, out.clone());

        let left = am.borrow().clone();
        let right = bm.borrow().clone();
        let mut merged = Map::with_capacity(left.len() + right.len());
        for (k, av) in left.iter() {
            let v = match right.get(k) {
                Some(bv) => self.merge(av, bv, Some(k), Some(&out)),
                None => clone_deep(av),
            };
            merged.insert(k.clone(), v);
        }
        for (k, bv) in right.iter() {
            if !left.contains_key(k) {
                merged.insert(k.clone(), clone_deep(bv));
            }
        }
        if let Value::Map(slot) = &out {
            *slot.borrow_mut() = merged;
        }
        out
    }

    /// Element-wise: maps at the same index merge, otherwise the right
    /// element wins; the longer side supplies the tail.
    fn merge_lists(&mut self, a: &Value, al: &Shared<Vec<Value>>, bl: &Shared<Vec<Value>>) -> Value {
        let pair = (al.id(), bl.id());
        if let Some(done) = self.memo.get(&pair) {
            return done.clone();
        }
        let out = Value::empty_list();
        self.memo.insert(pair, out.clone());

        let left = al.borrow().clone();
        let right = bl.borrow().clone();
        let merged: Vec<Value> = (0..left.len().max(right.len()))
            .map(|i| match (left.get(i), right.get(i)) {
                (Some(x @ Value::Map(_)), Some(y @ Value::Map(_))) => {
                    self.merge(x, y, Some(&Key::from(i)), Some(a))
                }
                (_, Some(y)) => clone_deep(y),
                (Some(x), None) => clone_deep(x),
                (None, None) => Value::Null,
            })
            .collect();
        if let Value::List(slot) = &out {
            *slot.borrow_mut() = merged;
        }
        out
    }
}

/// Deep-merges `objects` left to right into the first one.
///
/// Maps merge key by key; lists under the same key merge element-wise (maps
/// at the same index merge recursively, otherwise the right element wins,
/// and the result is as long as the longer list). A `Null` on the right
/// never overwrites. Every copied container is a deep clone.
///
/// The head decides the shape of the call:
/// - no objects: a new empty map;
/// - a `Null` head: `Null`;
/// - a single list: its deep clone;
/// - a map head: the merge is written back into it and the same handle is
///   returned; non-map operands are ignored;
/// - a list head: lists are folded in element-wise, in place;
/// - any other head: the map operands are merged into a new map.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::merge;
/// use unicore_value::Value;
///
/// let head = Value::from(json!({"a": 1}));
/// let out = merge(&[head.clone(), Value::from(json!({"b": 2})), Value::from(json!({"a": 4}))]);
/// assert!(out.same(&head));
/// assert_eq!(head, Value::from(json!({"a": 4, "b": 2})));
/// ```
pub fn merge(objects: &[Value]) -> Value {
    let Some((head, rest)) = objects.split_first() else {
        return Value::empty_map();
    };
    match head {
        Value::Null => Value::Null,
        Value::List(_) if rest.is_empty() => clone_deep(head),
        Value::Map(slot) => {
            let mut acc = head.clone();
            for o in rest.iter().filter(|o| matches!(o, Value::Map(_))) {
                acc = Merger::new(None).merge(&acc, o, None, None);
            }
            if let Value::Map(merged) = &acc {
                if !merged.ptr_eq(slot) {
                    let entries = merged.borrow().clone();
                    *slot.borrow_mut() = entries;
                }
            }
            head.clone()
        }
        Value::List(slot) => {
            let mut acc = head.clone();
            for o in rest.iter().filter(|o| matches!(o, Value::List(_))) {
                acc = Merger::new(None).merge(&acc, o, None, None);
            }
            if let Value::List(merged) = &acc {
                if !merged.ptr_eq(slot) {
                    let items = merged.borrow().clone();
                    *slot.borrow_mut() = items;
                }
            }
            head.clone()
        }
        _ => {
            let mut acc = Value::empty_map();
            for o in objects.iter().filter(|o| matches!(o, Value::Map(_))) {
                acc = Merger::new(None).merge(&acc, o, None, None);
            }
            acc
        }
    }
}

/// Like [`merge`], but `customizer` gets first refusal at every merge point,
/// including the root pair. The head is deep-cloned, never mutated.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::{merge_with, MergeCustomizer};
/// use unicore_value::{Key, Value};
///
/// let add_a = MergeCustomizer::keyed(|obj, src, key| match (obj, src, key) {
///     (Value::Int(x), Value::Int(y), Some(Key::Str(k))) if k == "a" => Some(Value::from(x + y)),
///     _ => None,
/// });
/// let out = merge_with(&[Value::from(json!({"a": 1})), Value::from(json!({"a": 2, "b": 2}))], &add_a);
/// assert_eq!(out, Value::from(json!({"a": 3, "b": 2})));
/// ```
pub fn merge_with(objects: &[Value], customizer: &MergeCustomizer<'_>) -> Value {
    let Some((head, rest)) = objects.split_first() else {
        return Value::empty_map();
    };
    let mut acc = clone_deep(head);
    for o in rest {
        acc = Merger::new(Some(customizer)).merge(&acc, o, None, None);
    }
    acc
}

/// Fills absent or `Null` entries of `target` from `sources`, recursively.
///
/// Existing values are never overwritten. Lists are filled element-wise,
/// and only where both sides hold maps. Mutates `target` and returns it, or
/// a clone of the first source when `target` itself is `Null`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::object::defaults_deep;
/// use unicore_value::Value;
///
/// let target = Value::from(json!({"a": {"b": 1}, "c": null}));
/// defaults_deep(&target, &[Value::from(json!({"a": {"b": 9, "x": 2}, "c": 3}))]);
/// assert_eq!(target, Value::from(json!({"a": {"b": 1, "x": 2}, "c": 3})));
/// ```
pub fn defaults_deep(target: &Value, sources: &[Value]) -> Value {
    let mut out = target.clone();
    let mut seen = HashSet::new();
    for src in sources.iter().filter(|s| matches!(s, Value::Map(_))) {
        out = fill_defaults(&out, src, &mut seen);
    }
    out
}

fn fill_defaults(a: &Value, b: &Value, seen: &mut HashSet<(usize, usize)>) -> Value {
    match (a, b) {
        (Value::Map(am), Value::Map(bm)) => {
            if !seen.insert((am.id(), bm.id())) {
                return a.clone();
            }
            let right = bm.borrow().clone();
            for (k, bv) in right.iter() {
                let existing = am.borrow().get(k).cloned();
                let filled = match existing {
                    Some(av) => fill_defaults(&av, bv, seen),
                    None => clone_deep(bv),
                };
                am.borrow_mut().insert(k.clone(), filled);
            }
            a.clone()
        }
        (Value::List(al), Value::List(bl)) => {
            if !seen.insert((al.id(), bl.id())) {
                return a.clone();
            }
            let left = al.borrow().clone();
            let right = bl.borrow().clone();
            for (x, y) in left.iter().zip(right.iter()) {
                if let (Value::Map(_), Value::Map(_)) = (x, y) {
                    fill_defaults(x, y, seen);
                }
            }
            a.clone()
        }
        (Value::Null, _) => clone_deep(b),
        _ => a.clone(),
    }
}
