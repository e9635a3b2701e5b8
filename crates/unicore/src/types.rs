//! Type predicates over [`Value`].

use unicore_value::Value;

pub use unicore_value::{
    is_array, is_boolean, is_empty, is_equal, is_finite, is_function, is_instance, is_integer,
    is_map, is_match, is_nan, is_null, is_number, is_object, is_string, is_undefined,
};

/// A descriptive kind name, for messages.
///
/// # Example
///
/// ```
/// use unicore::types::kind_name;
/// use unicore_value::{Object, Value};
///
/// assert_eq!(kind_name(&Value::from(1)), "integer");
/// assert_eq!(kind_name(&Value::object(Object::new("User"))), "instance");
/// ```
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::Str(_) => "string",
        Value::List(_) => "array",
        Value::Map(_) => "object",
        Value::Object(_) => "instance",
        Value::Func(_) => "function",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(&Value::Null), "null");
        assert_eq!(kind_name(&Value::from(true)), "boolean");
        assert_eq!(kind_name(&Value::from(1.5)), "float");
        assert_eq!(kind_name(&Value::from("s")), "string");
        assert_eq!(kind_name(&Value::empty_list()), "array");
        assert_eq!(kind_name(&Value::empty_map()), "object");
        assert_eq!(kind_name(&Value::func(|_| Ok(Value::Null))), "function");
    }

    #[test]
    fn test_reexported_predicates() {
        assert!(is_integer(&Value::from(3)));
        assert!(!is_number(&Value::from(true)));
        assert!(is_undefined(&Value::Null));
        assert!(is_nan(&Value::from(f64::NAN)));
        assert!(!is_finite(&Value::from(f64::INFINITY)));
    }
}
