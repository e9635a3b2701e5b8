use unicore_value::Value;

/// How far [`flatten`] descends into nested lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    /// Flatten every level.
    #[default]
    Deep,
    /// Flatten one level.
    Shallow,
    /// Flatten `n` levels; `0` copies, a negative count returns the input.
    Levels(i64),
}

impl Depth {
    fn budget(self) -> Option<i64> {
        match self {
            Depth::Deep => None,
            Depth::Shallow => Some(1),
            Depth::Levels(n) => Some(n),
        }
    }
}

/// Flattens nested [`Value::List`]s.
///
/// Iterative: an explicit stack of `(value, remaining depth)` pairs is
/// drained left to right, so very deep nesting cannot overflow the call
/// stack.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use unicore::array::{flatten, Depth};
/// use unicore_value::Value;
///
/// let nested = Value::from(json!([1, [2, [3, [4]]]]));
/// let items = nested.to_vec().unwrap();
/// assert_eq!(Value::list(flatten(&items, Depth::Deep)), Value::from(json!([1, 2, 3, 4])));
/// assert_eq!(
///     Value::list(flatten(&items, Depth::Shallow)),
///     Value::from(json!([1, 2, [3, [4]]]))
/// );
/// ```
pub fn flatten(items: &[Value], depth: Depth) -> Vec<Value> {
    let budget = depth.budget();
    if budget.is_some_and(|n| n < 0) {
        return items.to_vec();
    }
    let mut out = Vec::new();
    let mut stack: Vec<(Value, Option<i64>)> =
        items.iter().rev().map(|item| (item.clone(), budget)).collect();
    while let Some((item, remaining)) = stack.pop() {
        if let (Value::List(children), true) = (&item, remaining != Some(0)) {
            let next = remaining.map(|n| n - 1);
            stack.extend(children.borrow().iter().rev().map(|child| (child.clone(), next)));
            continue;
        }
        out.push(item);
    }
    out
}
