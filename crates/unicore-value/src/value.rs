//! The dynamic value tree.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::ValueError;
use crate::key::Key;

/// Insertion-ordered mapping.
pub type Map = IndexMap<Key, Value>;

/// Attribute table of an [`Object`].
pub type Attrs = IndexMap<String, Value>;

/// Reference-counted, interior-mutable container handle.
///
/// Cloning a `Shared` clones the handle, so both copies observe the same
/// container. Identity is pointer identity.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(inner: T) -> Self {
        Shared(Rc::new(RefCell::new(inner)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Address of the container, stable for its lifetime.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.id())
    }
}

/// An instance with a class name and named attributes.
#[derive(Debug, Clone, Default)]
pub struct Object {
    pub class: String,
    pub attrs: Attrs,
}

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Object {
            class: class.into(),
            attrs: IndexMap::new(),
        }
    }

    /// Builder-style attribute assignment.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.attrs.insert(name.into(), value);
    }
}

type NativeFn = dyn Fn(&[Value]) -> Result<Value, ValueError>;

/// A callable value.
///
/// The declared `arity` is what arity-aware combinators (`curry`, `ary`)
/// read; `None` means variadic.
#[derive(Clone)]
pub struct Func {
    name: Option<Rc<str>>,
    arity: Option<usize>,
    f: Rc<NativeFn>,
}

impl Func {
    pub fn new(f: impl Fn(&[Value]) -> Result<Value, ValueError> + 'static) -> Self {
        Func {
            name: None,
            arity: None,
            f: Rc::new(f),
        }
    }

    pub fn named(
        name: &str,
        f: impl Fn(&[Value]) -> Result<Value, ValueError> + 'static,
    ) -> Self {
        Func::new(f).with_name(name)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(Rc::from(name));
        self
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, ValueError> {
        (self.f)(args)
    }

    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.f) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Func) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<function {name}>"),
            None => f.write_str("<function>"),
        }
    }
}

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Shared<Vec<Value>>),
    Map(Shared<Map>),
    Object(Shared<Object>),
    Func(Func),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Shared::new(items))
    }

    pub fn map(map: Map) -> Self {
        Value::Map(Shared::new(map))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Shared::new(object))
    }

    pub fn func(f: impl Fn(&[Value]) -> Result<Value, ValueError> + 'static) -> Self {
        Value::Func(Func::new(f))
    }

    pub fn empty_list() -> Self {
        Value::list(Vec::new())
    }

    pub fn empty_map() -> Self {
        Value::map(Map::new())
    }

    /// Builds a map from key/value pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use unicore_value::{Key, Value};
    ///
    /// let v = Value::map_from([("a", Value::from(1)), ("b", Value::from("x"))]);
    /// assert_eq!(v.as_map().unwrap().borrow().get(&Key::from("a")), Some(&Value::from(1)));
    /// ```
    pub fn map_from<K, V, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list_from<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::list(items.into_iter().map(Into::into).collect())
    }

    /// Name of the variant, as reported in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Func(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_) | Value::Object(_))
    }

    /// Truthiness: null, `false`, zero, and empty strings, lists and maps are
    /// falsy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Map(map) => !map.borrow().is_empty(),
            Value::Object(_) | Value::Func(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of ints and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Shared<Vec<Value>>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Shared<Map>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Shared<Object>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Func> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Snapshot of a list's items (cheap handle clones).
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        self.as_list().map(|items| items.borrow().clone())
    }

    /// Length of strings (in chars) and containers.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.borrow().len()),
            Value::Map(map) => Some(map.borrow().len()),
            Value::Object(object) => Some(object.borrow().attrs.len()),
            _ => None,
        }
    }

    /// Identity of containers and functions.
    pub fn id(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.id()),
            Value::Map(map) => Some(map.id()),
            Value::Object(object) => Some(object.id()),
            Value::Func(f) => Some(f.id()),
            _ => None,
        }
    }

    /// `true` when both values are the same container or function, or equal
    /// scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self == other,
            _ => false,
        }
    }

    /// Calls a function value.
    pub fn call(&self, args: &[Value]) -> Result<Value, ValueError> {
        match self {
            Value::Func(f) => f.call(args),
            other => Err(ValueError::NotCallable(other.type_name())),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = HashSet::new();
        debug_value(self, f, &mut seen)
    }
}

fn debug_value(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    seen: &mut HashSet<usize>,
) -> fmt::Result {
    if let Some(id) = value.id() {
        if value.is_container() && !seen.insert(id) {
            return f.write_str("[Circular]");
        }
    }
    let result = match value {
        Value::Null => f.write_str("None"),
        Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
        Value::Int(i) => write!(f, "{i}"),
        Value::Float(x) => write!(f, "{x:?}"),
        Value::Str(s) => write!(f, "{s:?}"),
        Value::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                debug_value(item, f, seen)?;
            }
            f.write_str("]")
        }
        Value::Map(map) => {
            f.write_str("{")?;
            for (i, (k, v)) in map.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                match k {
                    Key::Str(s) => write!(f, "{s:?}: ")?,
                    other => write!(f, "{other}: ")?,
                }
                debug_value(v, f, seen)?;
            }
            f.write_str("}")
        }
        Value::Object(object) => {
            let object = object.borrow();
            write!(f, "{}(", object.class)?;
            for (i, (k, v)) in object.attrs.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{k}=")?;
                debug_value(v, f, seen)?;
            }
            f.write_str(")")
        }
        Value::Func(func) => write!(f, "{func:?}"),
    };
    if let Some(id) = value.id() {
        seen.remove(&id);
    }
    result
}

/// Human-readable rendering: strings print bare at the top level and quoted
/// inside containers; null prints as `None`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => {
                let mut seen = HashSet::new();
                display_nested(other, f, &mut seen)
            }
        }
    }
}

fn display_nested(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    seen: &mut HashSet<usize>,
) -> fmt::Result {
    match value {
        Value::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Float(x) if x.is_nan() => f.write_str("nan"),
        Value::Float(x) if x.is_infinite() => {
            f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
        }
        Value::List(items) => {
            if !seen.insert(items.id()) {
                return f.write_str("[...]");
            }
            f.write_str("[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                display_nested(item, f, seen)?;
            }
            seen.remove(&items.id());
            f.write_str("]")
        }
        Value::Map(map) => {
            if !seen.insert(map.id()) {
                return f.write_str("{...}");
            }
            f.write_str("{")?;
            for (i, (k, v)) in map.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                display_nested(&Value::from(k), f, seen)?;
                f.write_str(": ")?;
                display_nested(v, f, seen)?;
            }
            seen.remove(&map.id());
            f.write_str("}")
        }
        other => debug_value(other, f, seen),
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::map(map)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::object(object)
    }
}

impl From<Func> for Value {
    fn from(f: Func) -> Self {
        Value::Func(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy() {
        assert!(!Value::Null.truthy());
        assert!(!Value::from(0).truthy());
        assert!(!Value::from("").truthy());
        assert!(!Value::empty_list().truthy());
        assert!(!Value::empty_map().truthy());
        assert!(Value::from(0.5).truthy());
        assert!(Value::object(Object::new("Point")).truthy());
    }

    #[test]
    fn test_clone_shares_container() {
        let a = Value::list_from([1, 2]);
        let b = a.clone();
        b.as_list().unwrap().borrow_mut().push(Value::from(3));
        assert_eq!(a.len(), Some(3));
        assert!(a.same(&b));
    }

    #[test]
    fn test_debug_marks_cycles() {
        let a = Value::empty_list();
        a.as_list().unwrap().borrow_mut().push(a.clone());
        assert_eq!(format!("{a:?}"), "[[Circular]]");
        let shared = Value::list_from([1]);
        let twice = Value::list(vec![shared.clone(), shared]);
        assert_eq!(format!("{twice:?}"), "[[1], [1]]");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::from(true).to_string(), "True");
        assert_eq!(Value::from(1.0).to_string(), "1.0");
        assert_eq!(
            Value::list(vec![Value::from(1), Value::from("a")]).to_string(),
            "[1, 'a']"
        );
        assert_eq!(Value::map_from([("k", 2)]).to_string(), "{'k': 2}");
    }

    #[test]
    fn test_call_non_function() {
        assert_eq!(
            Value::from(1).call(&[]),
            Err(ValueError::NotCallable("int"))
        );
        let f = Value::func(|args| Ok(Value::from(args.len())));
        assert_eq!(f.call(&[Value::Null, Value::Null]), Ok(Value::from(2)));
    }

    #[test]
    fn test_object_builder() {
        let p = Object::new("Point").with("x", 1).with("y", 2);
        assert_eq!(p.get("y"), Some(&Value::from(2)));
        assert_eq!(p.class, "Point");
    }
}
