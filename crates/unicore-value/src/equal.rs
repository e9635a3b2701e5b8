use std::collections::HashSet;

use crate::value::Value;

/// Performs a deep structural equality check between two values.
///
/// Both sides must hold the same variant (`1 != 1.0`). Maps compare as
/// unordered key sets, lists element by element, objects by class name and
/// attributes, functions by identity. Container pairs already under
/// comparison are assumed equal, so cyclic structures terminate.
///
/// # Examples
///
/// ```
/// use unicore_value::{deep_equal, Value};
///
/// let a = Value::list_from([1, 2, 3]);
/// let b = Value::list_from([1, 2, 3]);
/// let c = Value::list_from([1, 2, 4]);
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    let mut visiting = HashSet::new();
    equal_inner(a, b, &mut visiting)
}

fn equal_inner(a: &Value, b: &Value, visiting: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),

        (Value::List(la), Value::List(lb)) => {
            if la.ptr_eq(lb) || !visiting.insert((la.id(), lb.id())) {
                return true;
            }
            let (xs, ys) = (la.borrow(), lb.borrow());
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(x, y)| equal_inner(x, y, visiting))
        }

        (Value::Map(ma), Value::Map(mb)) => {
            if ma.ptr_eq(mb) || !visiting.insert((ma.id(), mb.id())) {
                return true;
            }
            let (xs, ys) = (ma.borrow(), mb.borrow());
            xs.len() == ys.len()
                && xs.iter().all(|(key, x)| match ys.get(key) {
                    Some(y) => equal_inner(x, y, visiting),
                    None => false,
                })
        }

        (Value::Object(oa), Value::Object(ob)) => {
            if oa.ptr_eq(ob) || !visiting.insert((oa.id(), ob.id())) {
                return true;
            }
            let (xs, ys) = (oa.borrow(), ob.borrow());
            xs.class == ys.class
                && xs.attrs.len() == ys.attrs.len()
                && xs.attrs.iter().all(|(name, x)| match ys.attrs.get(name) {
                    Some(y) => equal_inner(x, y, visiting),
                    None => false,
                })
        }

        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}
