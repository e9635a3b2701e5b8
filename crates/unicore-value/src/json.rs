//! Bridge to `serde_json`.

use std::collections::HashSet;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map as JsonMap, Number};

use crate::error::ValueError;
use crate::key::Key;
use crate::value::{Map, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::map(
                obj.into_iter()
                    .map(|(k, v)| (Key::Str(k), Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl Value {
    /// Converts to a `serde_json::Value`.
    ///
    /// Map keys become strings, objects become maps of their attributes.
    /// Fails on cycles, functions and non-finite floats.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use unicore_value::Value;
    ///
    /// let v = Value::from(json!({"a": [1, 2.5, null]}));
    /// assert_eq!(v.to_json().unwrap(), json!({"a": [1, 2.5, null]}));
    /// ```
    pub fn to_json(&self) -> Result<serde_json::Value, ValueError> {
        let mut path = HashSet::new();
        to_json_inner(self, &mut path)
    }
}

fn to_json_inner(
    value: &Value,
    path: &mut HashSet<usize>,
) -> Result<serde_json::Value, ValueError> {
    let id = value.id().filter(|_| value.is_container());
    if let Some(id) = id {
        if !path.insert(id) {
            return Err(ValueError::Cycle);
        }
    }
    let out = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(ValueError::NotSerializable("float"))?,
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => serde_json::Value::Array(
            items
                .borrow()
                .iter()
                .map(|item| to_json_inner(item, path))
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(map) => {
            let mut obj = JsonMap::new();
            for (k, v) in map.borrow().iter() {
                obj.insert(k.to_string(), to_json_inner(v, path)?);
            }
            serde_json::Value::Object(obj)
        }
        Value::Object(object) => {
            let mut obj = JsonMap::new();
            for (k, v) in object.borrow().attrs.iter() {
                obj.insert(k.clone(), to_json_inner(v, path)?);
            }
            serde_json::Value::Object(obj)
        }
        Value::Func(_) => return Err(ValueError::NotSerializable("function")),
    };
    if let Some(id) = id {
        path.remove(&id);
    }
    Ok(out)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(_) | Value::Map(_) | Value::Object(_) => {
                // Cycle detection lives in to_json; serialize the checked tree.
                let json = self.to_json().map_err(S::Error::custom)?;
                match json {
                    serde_json::Value::Array(items) => {
                        let mut seq = serializer.serialize_seq(Some(items.len()))?;
                        for item in &items {
                            seq.serialize_element(item)?;
                        }
                        seq.end()
                    }
                    serde_json::Value::Object(obj) => {
                        let mut map = serializer.serialize_map(Some(obj.len()))?;
                        for (k, v) in &obj {
                            map.serialize_entry(k, v)?;
                        }
                        map.end()
                    }
                    other => other.serialize(serializer),
                }
            }
            Value::Func(_) => Err(S::Error::custom(ValueError::NotSerializable("function"))),
        }
    }
}
