//! Hashable keys.
//!
//! A [`Key`] is both the key type of [`Value::Map`](crate::Value::Map) and a
//! single step of a path. Only immutable values can become keys; containers
//! are rejected with [`ValueError::Unhashable`].

use std::fmt;

use crate::error::ValueError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    /// Composite key, built from a list of hashable values.
    Tuple(Vec<Key>),
}

impl Key {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Reads the key as a sequence index: an integer, or a string of
    /// decimal digits with an optional leading `-`.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(s) if is_int_literal(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// The same key with integer/string representation swapped, used as a
    /// lookup fallback (`"1"` <-> `1`).
    pub fn coerced(&self) -> Option<Key> {
        match self {
            Key::Int(i) => Some(Key::Str(i.to_string())),
            Key::Str(s) if is_int_literal(s) => s.parse().ok().map(Key::Int),
            _ => None,
        }
    }
}

/// `true` for `-?\d+`.
pub fn is_int_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => f.write_str("None"),
            Key::Bool(true) => f.write_str("True"),
            Key::Bool(false) => f.write_str("False"),
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
            Key::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Key::Str(s) => write!(f, "'{s}'")?,
                        other => write!(f, "{other}")?,
                    }
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Str(s.clone())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i as i64)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Int(i as i64)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl TryFrom<&Value> for Key {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Key::Null),
            Value::Bool(b) => Ok(Key::Bool(*b)),
            Value::Int(i) => Ok(Key::Int(*i)),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Key::Int(*f as i64)),
            Value::Str(s) => Ok(Key::Str(s.clone())),
            Value::List(items) => items
                .borrow()
                .iter()
                .map(Key::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Key::Tuple),
            other => Err(ValueError::Unhashable(other.type_name())),
        }
    }
}

impl TryFrom<Value> for Key {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Key::try_from(&value)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Null => Value::Null,
            Key::Bool(b) => Value::Bool(b),
            Key::Int(i) => Value::Int(i),
            Key::Str(s) => Value::Str(s),
            Key::Tuple(items) => Value::list(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<&Key> for Value {
    fn from(key: &Key) -> Self {
        Value::from(key.clone())
    }
}
