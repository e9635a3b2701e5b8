//! The mutating subset. Each function edits the vec it is given.

use std::cmp::Ordering;

/// Overwrites `items[start..end]` with clones of `value`.
///
/// `end` defaults to the length; both bounds clamp to it.
pub fn fill<T: Clone>(items: &mut [T], value: T, start: usize, end: Option<usize>) {
    let len = items.len();
    let end = end.unwrap_or(len).min(len);
    if start >= end {
        return;
    }
    items[start..end].fill(value);
}

/// Removes every occurrence of `values`, returning how many were removed.
pub fn pull<T: PartialEq>(items: &mut Vec<T>, values: &[T]) -> usize {
    let before = items.len();
    items.retain(|x| !values.contains(x));
    before - items.len()
}

/// Appends `values`, returning the new length.
pub fn push<T>(items: &mut Vec<T>, values: impl IntoIterator<Item = T>) -> usize {
    items.extend(values);
    items.len()
}

/// Stable in-place sort; incomparable pairs keep their order.
pub fn sort_in_place<T: PartialOrd>(items: &mut [T]) {
    items.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Removes `delete_count` items at `start` and inserts `insert` there.
///
/// A negative `start` counts from the end. Without `delete_count` everything
/// from `start` on is removed. Returns the removed items.
///
/// # Example
///
/// ```
/// use unicore::array::splice;
///
/// let mut xs = vec![1, 2, 3, 4, 5];
/// let removed = splice(&mut xs, -2, Some(1), [9, 9]);
/// assert_eq!(removed, vec![4]);
/// assert_eq!(xs, vec![1, 2, 3, 9, 9, 5]);
/// ```
pub fn splice<T>(
    items: &mut Vec<T>,
    start: i64,
    delete_count: Option<usize>,
    insert: impl IntoIterator<Item = T>,
) -> Vec<T> {
    let len = items.len() as i64;
    let start = if start < 0 { (len + start).max(0) } else { start.min(len) } as usize;
    let end = match delete_count {
        Some(n) => start.saturating_add(n).min(items.len()),
        None => items.len(),
    };
    items.splice(start..end, insert).collect()
}
