//! Fluent wrapper dispatching named operations through a [`Registry`].

use std::rc::Rc;

use tracing::debug;
use unicore_value::Value;

use crate::error::{Error, Result};
use crate::registry::Registry;

thread_local! {
    static DEFAULT_REGISTRY: Rc<Registry> = Rc::new(Registry::default());
}

/// Outcome of [`Chain::apply`]: containers stay wrapped, anything else is
/// handed back as is.
#[derive(Debug, Clone)]
pub enum Applied {
    Chain(Chain),
    Value(Value),
}

impl Applied {
    /// The plain value, unwrapping a chain if needed.
    pub fn into_value(self) -> Value {
        match self {
            Applied::Chain(chain) => chain.value,
            Applied::Value(value) => value,
        }
    }

    pub fn into_chain(self) -> Option<Chain> {
        match self {
            Applied::Chain(chain) => Some(chain),
            Applied::Value(_) => None,
        }
    }
}

/// Holds one value and applies registry operations to it.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::chain::chain;
/// use unicore_value::Value;
///
/// let out = chain(Value::from(json!([3, 1, 3, 2])))
///     .then("uniq", &[])
///     .and_then(|c| c.then("rest", &[]))
///     .unwrap();
/// assert_eq!(out.value(), &Value::from(json!([1, 2])));
/// ```
#[derive(Clone)]
pub struct Chain {
    value: Value,
    registry: Rc<Registry>,
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Chain").field(&self.value).finish()
    }
}

/// Wraps `value` using the built-in registry.
pub fn chain(value: impl Into<Value>) -> Chain {
    Chain::new(value)
}

impl Chain {
    /// Wraps `value` using this thread's shared built-in registry.
    pub fn new(value: impl Into<Value>) -> Self {
        let registry = DEFAULT_REGISTRY.with(Rc::clone);
        Self::with_registry(value, registry)
    }

    pub fn with_registry(value: impl Into<Value>, registry: Rc<Registry>) -> Self {
        Self {
            value: value.into(),
            registry,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    /// Applies `name` to the held value.
    ///
    /// The registry is consulted first; if it has no such entry and the held
    /// value is an object with a function attribute of that name, the
    /// attribute is called with `args`. String, list and map results come
    /// back wrapped.
    pub fn apply(&self, name: &str, args: &[Value]) -> Result<Applied> {
        let out = if self.registry.contains(name) {
            self.registry.call(name, &self.value, args)?
        } else {
            let method = self
                .value
                .as_object()
                .and_then(|o| o.borrow().get(name).and_then(Value::as_func).cloned())
                .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
            debug!(name, "chain dispatch to object attribute");
            method.call(args)?
        };
        Ok(match out {
            Value::Str(_) | Value::List(_) | Value::Map(_) => Applied::Chain(self.wrap(out)),
            other => Applied::Value(other),
        })
    }

    /// Like [`apply`](Self::apply), but always keeps the result wrapped.
    pub fn then(&self, name: &str, args: &[Value]) -> Result<Chain> {
        let out = self.apply(name, args)?.into_value();
        Ok(self.wrap(out))
    }

    fn wrap(&self, value: Value) -> Chain {
        Chain {
            value,
            registry: Rc::clone(&self.registry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unicore_value::Object;

    #[test]
    fn test_rewraps_containers_only() {
        let c = chain(Value::from(json!({"a": 1, "b": 2})));
        let keys = c.apply("keys", &[]).unwrap();
        assert!(matches!(keys, Applied::Chain(_)));
        assert_eq!(keys.into_value(), Value::from(json!(["a", "b"])));
        let size = c.apply("size", &[]).unwrap();
        assert!(matches!(size, Applied::Value(Value::Int(2))));
    }

    #[test]
    fn test_string_pipeline() {
        let out = chain("  Hello World ")
            .then("trim", &[])
            .and_then(|c| c.then("slugify", &[]))
            .unwrap();
        assert_eq!(out.into_value(), Value::from("hello-world"));
    }

    #[test]
    fn test_unknown_name() {
        let err = chain(1).apply("no_such_op", &[]).unwrap_err();
        assert_eq!(err, Error::UnknownFunction("no_such_op".into()));
    }

    #[test]
    fn test_object_attribute_fallback() {
        let obj = Object::new("Greeter")
            .with("greet", Value::func(|a| Ok(Value::from(format!("hi {}", a[0])))))
            .with("name", "x");
        let c = chain(Value::object(obj));
        let out = c.apply("greet", &[Value::from("bob")]).unwrap();
        assert_eq!(out.into_value(), Value::from("hi bob"));
        assert!(c.apply("name", &[]).is_err());
    }

    #[test]
    fn test_custom_registry_mixin() {
        let mut registry = Registry::default();
        registry.mixin("size", |_, _| Ok(Value::from(-1)));
        let c = Chain::with_registry(Value::from(json!([1, 2])), Rc::new(registry));
        assert_eq!(c.apply("size", &[]).unwrap().into_value(), Value::from(-1));
        assert_eq!(chain(json!([1, 2])).apply("size", &[]).unwrap().into_value(), Value::from(2));
    }
}
