use std::cmp::Ordering;

use crate::value::Value;

/// Orders two values the way sorting helpers expect.
///
/// Booleans, ints and floats compare numerically with each other, strings
/// lexicographically, lists element by element and then by length. Any other
/// pairing is incomparable and yields `None`, as does a NaN operand.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use unicore_value::{compare, Value};
///
/// assert_eq!(compare(&Value::from(1), &Value::from(1.5)), Some(Ordering::Less));
/// assert_eq!(compare(&Value::from("b"), &Value::from("a")), Some(Ordering::Greater));
/// assert_eq!(compare(&Value::from("a"), &Value::from(1)), None);
/// ```
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::List(x), Value::List(y)) => {
            if x.ptr_eq(y) {
                return Some(Ordering::Equal);
            }
            let (xs, ys) = (x.borrow(), y.borrow());
            for (l, r) in xs.iter().zip(ys.iter()) {
                match compare(l, r)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(xs.len().cmp(&ys.len()))
        }
        _ => numeric(a)?.partial_cmp(&numeric(b)?),
    }
}

/// [`compare`] with incomparable pairs treated as equal, for stable sorts.
pub fn compare_total(a: &Value, b: &Value) -> Ordering {
    compare(a, b).unwrap_or(Ordering::Equal)
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}
